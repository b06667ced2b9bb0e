use std::path::PathBuf;

use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use keytree::PublicKey;
use payments::Config;

const DEFAULT_CONFIG_PATH: &str = "cascade.toml";

pub enum RunCommand {
    /// config path, config
    ShowConfig(PathBuf, Config),
    /// config
    Init(Config),
    /// config
    Balance(Config),
    /// config, intent to build
    Plan(Config, Plan),
}

/// Intents the offline planner can build.
pub enum Plan {
    CreateAccount,
    Deposit { amount: u64 },
    Receive { amount: u64 },
    Send { destination: PublicKey, amount: u64, fee: u64 },
}

fn app() -> App<'static, 'static> {
    let amount = || Arg::with_name("amount").required(true).help("Amount in base units");
    App::new("cascade")
        .version(crate_version!())
        .about("Offline tools for a cascade wallet")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .global(true)
                .help("Path to the config file [default: cascade.toml]"),
        )
        .subcommand(SubCommand::with_name("config").about("Show the current configuration"))
        .subcommand(SubCommand::with_name("init").about("Create a wallet seed and an empty tray"))
        .subcommand(SubCommand::with_name("balance").about("Show the committed balances"))
        .subcommand(
            SubCommand::with_name("plan")
                .about("Build an intent against the committed tray and print its actions")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(SubCommand::with_name("create-account").about("Open every account of the tray"))
                .subcommand(
                    SubCommand::with_name("deposit")
                        .about("Move funds from the primary account into the buckets")
                        .arg(amount()),
                )
                .subcommand(
                    SubCommand::with_name("receive")
                        .about("Move the incoming balance into the buckets")
                        .arg(amount()),
                )
                .subcommand(
                    SubCommand::with_name("send")
                        .about("Pay privately out of the buckets")
                        .arg(Arg::with_name("destination").required(true).help("Base58 token account"))
                        .arg(amount())
                        .arg(
                            Arg::with_name("fee")
                                .long("fee")
                                .takes_value(true)
                                .help("Code fee taken out of the amount"),
                        ),
                ),
        )
}

/// Parses command line args into the command to run.
pub fn parse_args() -> Result<RunCommand, String> {
    let matches = app().get_matches();
    let config = || load_config(&matches);

    match matches.subcommand() {
        ("config", _) => {
            let (path, config) = config()?;
            Ok(RunCommand::ShowConfig(path, config))
        }
        ("init", _) => Ok(RunCommand::Init(config()?.1)),
        ("balance", _) => Ok(RunCommand::Balance(config()?.1)),
        ("plan", Some(plan)) => Ok(RunCommand::Plan(config()?.1, parse_plan(plan)?)),
        (x, _) => Err(format!(
            "Unknown subcommand: `{}`. Use `help` to see a list of available options.",
            x
        )),
    }
}

fn parse_plan(matches: &ArgMatches) -> Result<Plan, String> {
    match matches.subcommand() {
        ("create-account", _) => Ok(Plan::CreateAccount),
        ("deposit", Some(m)) => Ok(Plan::Deposit {
            amount: parse_amount(m, "amount")?,
        }),
        ("receive", Some(m)) => Ok(Plan::Receive {
            amount: parse_amount(m, "amount")?,
        }),
        ("send", Some(m)) => {
            let destination = m
                .value_of("destination")
                .unwrap_or_default()
                .parse::<PublicKey>()
                .map_err(|e| format!("Invalid destination: {}", e))?;
            let fee = match m.value_of("fee") {
                Some(_) => parse_amount(m, "fee")?,
                None => 0,
            };
            Ok(Plan::Send {
                destination,
                amount: parse_amount(m, "amount")?,
                fee,
            })
        }
        (x, _) => Err(format!("Unknown intent: `{}`", x)),
    }
}

fn parse_amount(matches: &ArgMatches, name: &str) -> Result<u64, String> {
    let value = matches.value_of(name).unwrap_or_default();
    value
        .replace('_', "")
        .parse()
        .map_err(|_| format!("Invalid {}: `{}`", name, value))
}

/// An explicitly named config file must exist; the default one is optional.
fn load_config(matches: &ArgMatches) -> Result<(PathBuf, Config), String> {
    match matches.value_of("config") {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = Config::load(&path).map_err(|e| e.to_string())?;
            Ok((path, config))
        }
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if path.exists() {
                let config = Config::load(&path).map_err(|e| e.to_string())?;
                Ok((path, config))
            } else {
                Ok((path, Config::default()))
            }
        }
    }
}
