use crate::{config::Config, episode::EpisodeRunner};

mod basestation;
mod config;
mod connectivity;
mod environment;
mod episode;
mod error;
mod logger;
mod reward;
mod topology;
mod user;

fn main() {
    let runner = match EpisodeRunner::new() {
        Ok(r) => r,
        Err(e) => panic!("{}", e),
    };
    if let Some(path) = &runner.cli.save_default_config {
        match Config::save_default(path.clone()) {
            Err(e) => panic!("{}", e),
            Ok(_) => (),
        };
    }
    let res = runner.run();
    if runner.cli.csv {
        println!("{}", res.get_csv_header());
        println!("{}", res.get_csv());
    } else {
        println!("\n=================== Average episode results ===================");
        println!("{}", res.get_report());
    }
}
