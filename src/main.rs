use color_eyre::eyre::{
    Result,
    eyre,
};
use roulette_client::{
    Bet,
    SessionState,
    WagerSession,
    amount::format_chips,
    ledger::Address,
    outcome::{
        Outcome,
        classify,
    },
    sim::SimLedger,
    wheel,
};
use std::path::{
    Path,
    PathBuf,
};
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

struct DemoConfig {
    bet: Option<Bet>,
    amount: String,
    wheel: Option<u8>,
    spins: u32,
    log_dir: Option<PathBuf>,
}

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: roulette-client [--bet <red|black|even|odd|low|high|0-36>] [--multiplier-draw]\n\
         [--amount <chips>] [--wheel <0-36>] [--spins <n>] [--log-dir <path>]\n\
         \n\
         Flags:\n\
           --bet <selection>   Discrete roulette bet (default: red)\n\
           --multiplier-draw   Pure multiplier draw, no bet selection\n\
           --amount <chips>    Decimal chip amount to wager (default: 1)\n\
           --wheel <0-36>      Pin the simulated wheel number\n\
           --spins <n>         Number of spins to run (default: 1)\n\
           --log-dir <path>    Write a rolling log file instead of stderr"
    );
    std::process::exit(0);
}

fn parse_bet(text: &str) -> Result<Bet> {
    match text.to_ascii_lowercase().as_str() {
        "red" => Ok(Bet::Red),
        "black" => Ok(Bet::Black),
        "even" => Ok(Bet::Even),
        "odd" => Ok(Bet::Odd),
        "low" => Ok(Bet::Low),
        "high" => Ok(Bet::High),
        other => other
            .parse::<u8>()
            .ok()
            .and_then(Bet::number)
            .ok_or_else(|| eyre!("Unknown bet '{text}'")),
    }
}

fn parse_cli_args() -> Result<DemoConfig> {
    let mut args = std::env::args().skip(1);
    let mut bet: Option<Bet> = None;
    let mut multiplier_draw = false;
    let mut amount: Option<String> = None;
    let mut wheel: Option<u8> = None;
    let mut spins: Option<u32> = None;
    let mut log_dir: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bet" => {
                let text = args
                    .next()
                    .ok_or_else(|| eyre!("--bet requires a selection"))?;
                if bet.is_some() {
                    return Err(eyre!("--bet may only be specified once"));
                }
                bet = Some(parse_bet(&text)?);
            }
            "--multiplier-draw" => multiplier_draw = true,
            "--amount" => {
                let text = args
                    .next()
                    .ok_or_else(|| eyre!("--amount requires a decimal amount"))?;
                if amount.is_some() {
                    return Err(eyre!("--amount may only be specified once"));
                }
                amount = Some(text);
            }
            "--wheel" => {
                let text = args
                    .next()
                    .ok_or_else(|| eyre!("--wheel requires a number"))?;
                let number: u8 = text
                    .parse()
                    .map_err(|_| eyre!("--wheel expects a number 0-36"))?;
                if number > 36 {
                    return Err(eyre!("--wheel expects a number 0-36"));
                }
                wheel = Some(number);
            }
            "--spins" => {
                let text = args
                    .next()
                    .ok_or_else(|| eyre!("--spins requires a count"))?;
                spins = Some(text.parse().map_err(|_| eyre!("--spins expects a count"))?);
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path"))?;
                log_dir = Some(PathBuf::from(dir));
            }
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    if multiplier_draw && bet.is_some() {
        return Err(eyre!("--multiplier-draw and --bet are mutually exclusive"));
    }
    let bet = if multiplier_draw {
        None
    } else {
        Some(bet.unwrap_or(Bet::Red))
    };

    Ok(DemoConfig {
        bet,
        amount: amount.unwrap_or_else(|| String::from("1")),
        wheel,
        spins: spins.unwrap_or(1),
        log_dir,
    })
}

fn init_tracing(log_dir: Option<&Path>) {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    match log_dir {
        Some(dir) => {
            let file = rolling::daily(dir, "roulette-client.log");
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(file)
                .with_ansi(false)
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .try_init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = parse_cli_args()?;
    init_tracing(config.log_dir.as_deref());
    run(config).await
}

async fn run(config: DemoConfig) -> Result<()> {
    let ledger = SimLedger::new();
    let player = Address([7u8; 32]);
    // Deliberately fragmented holdings so the assembler has work to do.
    ledger.fund(player, &[2_500_000, 1_500_000, 1_000_000]);
    if let Some(number) = config.wheel {
        ledger.set_wheel_number(number);
    }

    let mut session = WagerSession::new(Some(player), ledger.chip_token());
    let balance = session
        .refresh_balance(&ledger)
        .await
        .map_err(|e| eyre!("{e}"))?;
    println!("Balance: {} chips", format_chips(balance));

    for index in 1..=config.spins {
        let selection = match config.bet {
            Some(bet) => bet.label(),
            None => String::from("multiplier draw"),
        };
        println!("Spin {index}: {selection} for {} chips", config.amount);
        match session.spin(&ledger, config.bet, &config.amount).await {
            SessionState::Settled(settlement) => {
                if config.bet.is_some() {
                    println!("  wheel stops on {}", wheel::cosmetic_stop());
                }
                match classify(settlement) {
                    Outcome::LostAll => println!(
                        "  lost {} chips",
                        format_chips(settlement.deposit)
                    ),
                    Outcome::PartialLoss => println!(
                        "  partial loss: {} of {} chips returned",
                        format_chips(settlement.payout),
                        format_chips(settlement.deposit)
                    ),
                    Outcome::BreakEven => println!(
                        "  break even: {} chips returned",
                        format_chips(settlement.payout)
                    ),
                    Outcome::Won { jackpot } => println!(
                        "  won {} chips at {}{}",
                        format_chips(settlement.payout),
                        settlement.multiplier,
                        if jackpot { " (jackpot!)" } else { "" }
                    ),
                }
            }
            SessionState::Failed(spin_error) => {
                println!("  spin failed: {spin_error}");
                if spin_error.is_pre_submission() {
                    println!("  nothing was signed or submitted");
                }
            }
            _ => {}
        }

        if let Some(due) = session.balance_refresh_due() {
            tokio::time::sleep_until(due).await;
            let balance = session
                .refresh_balance(&ledger)
                .await
                .map_err(|e| eyre!("{e}"))?;
            println!("Balance: {} chips", format_chips(balance));
        }
        session.clear();
    }
    Ok(())
}
