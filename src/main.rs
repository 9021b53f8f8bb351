extern crate anyhow;
extern crate flexi_logger;
extern crate getopts;
#[macro_use]
extern crate log;
extern crate reqwest;
#[macro_use]
extern crate serde_derive;

mod fetcher;
mod nextbus;
mod result;
mod settings;
mod widget;

use anyhow::Context;

fn print_usage(program: &str, opts: &getopts::Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn start_logger(log_dir: &str) -> anyhow::Result<flexi_logger::LoggerHandle> {
    return flexi_logger::Logger::try_with_env_or_str("info")?
        .log_to_file(flexi_logger::FileSpec::default().directory(log_dir))
        .duplicate_to_stderr(flexi_logger::Duplicate::Warn)
        .start()
        .with_context(|| format!("while starting logger in '{}'", log_dir));
}

fn print_panel(panel: &widget::Panel) {
    println!("== {} ==", panel.title);
    print!("{}", panel.body);
    if !panel.body.is_empty() && !panel.body.ends_with('\n') {
        println!();
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let mut opts = getopts::Options::new();
    opts.optopt("c", "config", "Settings file (JSON).", "FILENAME");
    opts.optopt("a", "agency", "Agency tag, e.g. ttc.", "AGENCY");
    opts.optopt("s", "stop", "Stop id.", "STOP");
    opts.optopt("t", "title", "Panel title.", "TITLE");
    opts.optopt("l", "log-dir", "Where to write log files.", "DIR");
    opts.optflag("o", "one-shot", "refresh once and exit");
    opts.optflag("h", "help", "print this help");

    let matches = opts.parse(&args[1..]).context("parsing command line")?;
    if matches.opt_present("help") {
        print_usage(&args[0], &opts);
        return Ok(());
    }

    let _logger = start_logger(&matches.opt_str("log-dir").unwrap_or(".".to_string()))?;

    let loaded = match matches.opt_str("config") {
        Some(path) => settings::settings_from_file(&path)?,
        None => settings::Settings::default(),
    };
    let overrides = settings::Overrides{
        title: matches.opt_str("title"),
        agency: matches.opt_str("agency"),
        stop_id: matches.opt_str("stop"),
    };
    let one_shot = matches.opt_present("one-shot");

    let widget = widget::Widget::new(overrides.apply(loaded));
    info!("Running. agency={} stop={} one-shot={}",
          widget.settings().agency, widget.settings().stop_id, one_shot);

    loop {
        print_panel(&widget.refresh());

        if one_shot {
            break;
        }

        std::thread::sleep(widget.settings().refresh_interval());
    }

    return Ok(());
}
