mod cli_args;

use accounts::{Role, Tray};
use dotenv::dotenv;
use payments::{create_seed, logging, open_wallet, ClientError, Config, JsonFileStore, TrayStore};
use tracing::info;

use cli_args::{Plan, RunCommand};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let command = match cli_args::parse_args() {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(command).await {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: RunCommand) -> Result<(), ClientError> {
    match command {
        RunCommand::ShowConfig(path, config) => {
            println!("# {}", path.display());
            println!("{}", config.to_toml()?);
            println!("# Available options:{}", Config::documentation());
        }
        RunCommand::Init(config) => {
            logging::init(&config.log)?;
            let root = create_seed(&mut rand::thread_rng(), &config.wallet.seed_path).await?;
            let tray = Tray::new(root, config.ledger)?;
            JsonFileStore::new(&config.wallet.state_path)
                .store(&tray.state())
                .await?;
            info!(owner = %tray.owner().cluster.authority_key(), "wallet created");
            println!("{}", tray.owner().cluster.vault());
        }
        RunCommand::Balance(config) => {
            logging::init(&config.log)?;
            let tray = load_tray(&config).await?;
            print_balance(&tray);
        }
        RunCommand::Plan(config, plan) => {
            logging::init(&config.log)?;
            let tray = load_tray(&config).await?;
            let rng = &mut rand::thread_rng();
            let intent = match plan {
                Plan::CreateAccount => intents::create_account(rng, &tray)?,
                Plan::Deposit { amount } => intents::deposit(rng, &tray, &Role::Primary, amount)?,
                Plan::Receive { amount } => intents::receive_from_incoming(rng, &tray, amount)?,
                Plan::Send {
                    destination,
                    amount,
                    fee,
                } => intents::private_transfer(rng, &tray, destination, amount, fee, &[], false)?,
            };
            println!("{}", serde_json::to_string_pretty(&intent.descriptor())?);
            println!("# Resulting balances:");
            print_balance(intent.result_tray());
        }
    }
    Ok(())
}

async fn load_tray(config: &Config) -> Result<Tray, ClientError> {
    let store = JsonFileStore::new(&config.wallet.state_path);
    open_wallet(&config.wallet.seed_path, &store, &config.ledger).await
}

fn print_balance(tray: &Tray) {
    let line = |role: &Role, index: u64, balance: u64| println!("{:<16} #{:<4} {:>14}", role.to_string(), index, balance);
    for account in [tray.owner(), tray.incoming(), tray.outgoing()].iter() {
        line(&account.cluster.role, account.cluster.index, account.partial_balance);
    }
    for slot in tray.slots() {
        line(&slot.role(), slot.account.cluster.index, slot.account.partial_balance);
    }
    println!("{:<22} {:>14}", "total", tray.total_balance());
}
