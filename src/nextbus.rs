extern crate serde;
extern crate serde_json;
extern crate serde_with;

use crate::result;
use serde::Deserialize;
use serde_with::{DefaultOnError, DisplayFromStr, serde_as};

// Top level of https://webservices.umoiq.com/service/publicJSONFeed?command=predictions
#[derive(Deserialize, Debug)]
#[allow(dead_code)]
pub struct NextBusResponse {
    #[serde(default)]
    pub copyright: String,
    pub predictions: PredictionFeed,
}

#[derive(Deserialize, Debug, Default)]
#[allow(dead_code)]
#[serde(default, rename_all = "camelCase")]
pub struct PredictionFeed {
    pub route_tag: String,
    pub stop_tag: String,
    pub route_title: String,
    pub agency_title: String,
    pub stop_title: String,
    pub direction: Direction,
}

// "prediction" is an object when the stop has one upcoming arrival and an
// array when it has several. It is left undecoded here and only looked at
// through `ShapeTrial`.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Direction {
    pub title: String,
    #[serde(rename = "prediction")]
    pub prediction_raw: serde_json::Value,
}

// The feed sends every number as a string. Anything that doesn't parse as a
// non-negative integer (including a missing field) is read as 0.
#[serde_as]
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[allow(dead_code)]
#[serde(default, rename_all = "camelCase")]
pub struct Prediction {
    pub affected_by_layover: String,
    #[serde_as(as = "DefaultOnError<DisplayFromStr>")]
    pub seconds: u64,
    pub trip_tag: String,
    #[serde_as(as = "DefaultOnError<DisplayFromStr>")]
    pub minutes: u64,
    pub is_departure: String,
    pub block: String,
    pub dir_tag: String,
    pub branch: String,
    pub epoch_time: String,
    pub vehicle: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PredictionShape {
    Single,
    Multiple,
    Unresolved,
}

/// Outcome of decoding one direction payload both ways.
#[derive(Debug)]
pub struct ShapeTrial {
    pub single: Option<Prediction>,
    pub multiple: Option<Vec<Prediction>>,
}

impl ShapeTrial {
    // Serde would also build a struct out of a JSON array (positionally), so
    // each decode only runs on the JSON kind it is meant for.
    pub fn run(raw: &serde_json::Value) -> ShapeTrial {
        let single = match *raw {
            serde_json::Value::Object(_) => Prediction::deserialize(raw).ok(),
            _ => None,
        };
        let multiple = match raw.as_array() {
            Some(items) if items.iter().all(|item| item.is_object()) => {
                Vec::<Prediction>::deserialize(raw).ok()
            },
            _ => None,
        };

        return ShapeTrial{
            single: single,
            multiple: multiple,
        };
    }

    // A successful sequence decode wins over an object decode.
    pub fn shape(&self) -> PredictionShape {
        if self.multiple.is_some() {
            return PredictionShape::Multiple;
        } else if self.single.is_some() {
            return PredictionShape::Single;
        }
        return PredictionShape::Unresolved;
    }

    pub fn into_predictions(self) -> Vec<Prediction> {
        match (self.multiple, self.single) {
            (Some(items), _) => return items,
            (None, Some(item)) => return vec![item],
            (None, None) => return vec![],
        }
    }
}

pub fn parse_response(response_body: &[u8]) -> result::NextBusResult<NextBusResponse> {
    let response: NextBusResponse = serde_json::from_slice(response_body)?;
    return Ok(response);
}

pub fn normalize(direction: &Direction) -> Vec<Prediction> {
    let trial = ShapeTrial::run(&direction.prediction_raw);
    debug!("Direction '{}' resolved as {:?}", direction.title, trial.shape());
    return trial.into_predictions();
}

pub fn format_line(route_title: &str, prediction: &Prediction) -> String {
    let minutes = prediction.seconds / 60;
    let seconds = prediction.seconds % 60;
    return format!("{} [{:02}:{:02}] Bus: {}\n", route_title, minutes, seconds, prediction.vehicle);
}

pub fn format_predictions(response_body: &[u8]) -> result::NextBusResult<String> {
    let response = parse_response(response_body)?;
    let feed = &response.predictions;
    let predictions = normalize(&feed.direction);

    debug!("{} predictions for '{}' at '{}'", predictions.len(), feed.route_title, feed.stop_title);

    return Ok(predictions.iter()
              .map(|p| format_line(&feed.route_title, p))
              .collect());
}

#[cfg(test)]
mod tests {
    use super::{PredictionShape, ShapeTrial};

    fn feed_with_direction(route_title: &str, prediction_json: &str) -> Vec<u8> {
        return format!(
            r#"{{"copyright":"All data copyright Toronto Transit Commission 2024.","predictions":{{"routeTag":"504","stopTag":"14646","routeTitle":"{}","agencyTitle":"Toronto Transit Commission","stopTitle":"King St West At Spadina Ave","direction":{{"title":"East - 504a King towards Distillery","prediction":{}}}}}}}"#,
            route_title, prediction_json).into_bytes();
    }

    #[test]
    fn single_object_payload() {
        let body = feed_with_direction("Downtown", r#"{"seconds":"90","minutes":"1","vehicle":"101"}"#);

        assert_eq!("Downtown [01:30] Bus: 101\n", super::format_predictions(&body).unwrap());
    }

    #[test]
    fn array_payload_keeps_source_order() {
        let body = feed_with_direction(
            "504-King",
            r#"[{"seconds":"10","minutes":"0","vehicle":"A"},{"seconds":"130","minutes":"2","vehicle":"B"}]"#);

        assert_eq!("504-King [00:10] Bus: A\n504-King [02:10] Bus: B\n",
                   super::format_predictions(&body).unwrap());
    }

    #[test]
    fn seconds_rendering() {
        let mut p = super::Prediction::default();
        p.vehicle = "4410".to_string();

        p.seconds = 125;
        assert_eq!("R [02:05] Bus: 4410\n", super::format_line("R", &p));
        p.seconds = 59;
        assert_eq!("R [00:59] Bus: 4410\n", super::format_line("R", &p));
        p.seconds = 3661;
        assert_eq!("R [61:01] Bus: 4410\n", super::format_line("R", &p));
        p.seconds = 6000;
        assert_eq!("R [100:00] Bus: 4410\n", super::format_line("R", &p));
    }

    #[test]
    fn minutes_come_from_seconds() {
        let body = feed_with_direction("R", r#"{"seconds":"185","minutes":"7","vehicle":"9"}"#);

        assert_eq!("R [03:05] Bus: 9\n", super::format_predictions(&body).unwrap());
    }

    #[test]
    fn non_numeric_seconds_read_as_zero() {
        let body = feed_with_direction(
            "R",
            r#"[{"seconds":"soon","vehicle":"1"},{"seconds":"-5","vehicle":"2"},{"vehicle":"3"}]"#);

        assert_eq!("R [00:00] Bus: 1\nR [00:00] Bus: 2\nR [00:00] Bus: 3\n",
                   super::format_predictions(&body).unwrap());
    }

    #[test]
    fn non_numeric_minutes_read_as_zero() {
        let p: super::Prediction = serde_json::from_str(
            r#"{"seconds":"130","minutes":"two","vehicle":"8"}"#).unwrap();
        assert_eq!(130, p.seconds);
        assert_eq!(0, p.minutes);

        let p: super::Prediction = serde_json::from_str(r#"{"seconds":"130","vehicle":"8"}"#).unwrap();
        assert_eq!(0, p.minutes);
    }

    #[test]
    fn null_or_garbage_payload_is_empty() {
        let payloads = [
            "null", "\"no predictions\"", "42", "[1,2]", "true", "[]",
            r#"["true","125"]"#, r#"[["x","61"]]"#, r#"[{"seconds":"5","vehicle":"1"},"x"]"#,
        ];
        for payload in &payloads {
            let body = feed_with_direction("R", payload);
            assert_eq!("", super::format_predictions(&body).unwrap(), "payload {}", payload);
        }
    }

    #[test]
    fn missing_direction_is_empty() {
        let body = br#"{"copyright":"x","predictions":{"routeTitle":"R","stopTitle":"S","dirTitleBecauseNoPredictions":"East"}}"#;

        assert_eq!("", super::format_predictions(body).unwrap());
    }

    #[test]
    fn malformed_envelope_is_an_error() {
        assert!(super::format_predictions(b"<html>503</html>").is_err());
        assert!(super::format_predictions(b"{\"predictions\":").is_err());
        assert!(super::format_predictions(b"{\"Error\":{\"content\":\"bad stop\"}}").is_err());
    }

    #[test]
    fn format_is_repeatable() {
        let body = feed_with_direction("R", r#"[{"seconds":"61","vehicle":"1"},{"seconds":"62","vehicle":"2"}]"#);

        assert_eq!(super::format_predictions(&body).unwrap(),
                   super::format_predictions(&body).unwrap());
    }

    #[test]
    fn shape_trial() {
        let single = serde_json::json!({"seconds": "5", "vehicle": "7"});
        let trial = ShapeTrial::run(&single);
        assert_eq!(PredictionShape::Single, trial.shape());
        assert_eq!(1, trial.into_predictions().len());

        let multiple = serde_json::json!([{"seconds": "5"}, {"seconds": "6"}, {"seconds": "7"}]);
        let trial = ShapeTrial::run(&multiple);
        assert_eq!(PredictionShape::Multiple, trial.shape());
        assert_eq!(3, trial.into_predictions().len());

        let trial = ShapeTrial::run(&serde_json::json!([]));
        assert_eq!(PredictionShape::Multiple, trial.shape());
        assert!(trial.single.is_none());
        assert!(trial.into_predictions().is_empty());

        let trial = ShapeTrial::run(&serde_json::json!(["true", "125"]));
        assert!(trial.single.is_none());
        assert!(trial.multiple.is_none());

        let trial = ShapeTrial::run(&serde_json::json!([["x", "61"]]));
        assert_eq!(PredictionShape::Unresolved, trial.shape());

        let trial = ShapeTrial::run(&serde_json::Value::Null);
        assert_eq!(PredictionShape::Unresolved, trial.shape());
        assert!(trial.into_predictions().is_empty());
    }

    #[test]
    fn sequence_decode_wins_a_tie() {
        let trial = ShapeTrial {
            single: Some(super::Prediction::default()),
            multiple: Some(vec![]),
        };

        assert_eq!(PredictionShape::Multiple, trial.shape());
        assert!(trial.into_predictions().is_empty());
    }

    #[test]
    fn golden_single() {
        let body = std::fs::read("testdata/predictions_single.json")
            .expect("Error reading predictions_single.json");

        assert_eq!("504-King [04:12] Bus: 4410\n", super::format_predictions(&body).unwrap());
    }

    #[test]
    fn golden_multiple() {
        let body = std::fs::read("testdata/predictions_multiple.json")
            .expect("Error reading predictions_multiple.json");

        let response = super::parse_response(&body).expect("parse_response");
        assert_eq!("King St West At Spadina Ave", response.predictions.stop_title);
        assert_eq!("East - 504a King towards Distillery", response.predictions.direction.title);

        let predictions = super::normalize(&response.predictions.direction);
        assert_eq!(3, predictions.len());
        assert_eq!("87_1_60", predictions[0].trip_tag);
        assert_eq!("false", predictions[0].is_departure);

        assert_eq!(
            "504-King [02:17] Bus: 4473\n504-King [09:41] Bus: 4418\n504-King [16:03] Bus: 4590\n",
            super::format_predictions(&body).unwrap());
    }
}
