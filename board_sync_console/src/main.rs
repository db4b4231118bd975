// Legend for various fix-this comments:
//   * "TODO" - bug or missing crucial feature.
//   * "Improvement potential" - missing nice-to-have feature or an opportunity
//       to make code better or faster.
//   * "Rust-upgrade" - place where code can be improved using a Rust feature
//       that is not implemented or stabilized yet.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod check_script;
mod replay;
mod replay_config;
mod tui;

use clap::{Command, arg};


fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Board sync")
        .version(clap::crate_version!())
        .about("Runs the board synchronization engine without a browser")
        .subcommand_required(true)
        .subcommand(
            Command::new("replay")
                .about("Replay a scripted session and draw the board after every step")
                .arg(arg!(<config_file> "Path to the yaml-serialized ReplayConfig"))
                .arg(arg!(--"final-only" "Only draw the board once, after the last step.")),
        )
        .subcommand(
            Command::new("stress-test")
                .about(concat!(
                    "Feed random server updates and local actions to the client state and ",
                    "verify that rendering never goes out of sync."
                ))
                .arg(
                    arg!(-'n' --"batches" <n> "Number of batches to run; runs forever if omitted")
                        .value_parser(clap::value_parser!(u64).range(1..)),
                ),
        )
        .subcommand(
            Command::new("check-script")
                .about("Verifies that every line of a replay script parses.")
                .arg(arg!(<script_file> "Path to the JSON-lines script")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("replay", sub_matches)) => {
            let config_file = sub_matches.get_one::<String>("config_file").unwrap();
            replay::run(replay::ReplayOptions {
                config: replay_config::read_config_file(config_file)?,
                final_only: sub_matches.get_flag("final-only"),
            })
        }
        Some(("stress-test", sub_matches)) => stress_test::run(stress_test::StressTestConfig {
            batches: sub_matches.get_one::<u64>("batches").copied(),
        }),
        Some(("check-script", sub_matches)) => {
            check_script::run(sub_matches.get_one::<String>("script_file").unwrap())
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
