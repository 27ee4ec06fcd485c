use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use urgeflow::history::{compute_stats, daily_outcomes, HistoryStore, InMemoryHistoryStore};
use urgeflow::kernel::countdown::format_mm_ss;
use urgeflow::kernel::types::UrgeType;
use urgeflow::services::llm::schema::{ImplementationIntentionInput, UrgeSurfingInput};
use urgeflow::{ActionResult, GatewayConfig, LlmGateway, WizardDriver, WizardEvent, WizardState};

enum Command {
    Wizard(WizardEvent),
    Reset,
    History,
    Progress,
    Plan { category: String, triggers: String },
    Surf { urge_type: String, intensity: f64 },
    Help,
    Quit,
}

fn parse_level(arg: &str) -> Result<i64, String> {
    arg.trim().parse().map_err(|_| format!("'{}' is not a number", arg.trim()))
}

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "aware" => Command::Wizard(WizardEvent::AcknowledgeUrge),
        "type" => {
            let urge_type: UrgeType = rest.parse().map_err(|e| format!("{}", e))?;
            Command::Wizard(WizardEvent::SelectUrgeType(urge_type))
        }
        "intensity" => Command::Wizard(WizardEvent::SetIntensity(parse_level(rest)?)),
        "next" => Command::Wizard(WizardEvent::Advance),
        "motivation" => Command::Wizard(WizardEvent::SetMotivation(parse_level(rest)?)),
        "ability" => Command::Wizard(WizardEvent::SetAbility(parse_level(rest)?)),
        "back" => Command::Wizard(WizardEvent::Back),
        "suggest" => Command::Wizard(WizardEvent::RequestSuggestion {
            context: Some(rest.to_string()).filter(|c| !c.is_empty()),
        }),
        "resolved" => Command::Wizard(WizardEvent::Resolved),
        "delay" => Command::Wizard(WizardEvent::StartDelay),
        "faded" => Command::Wizard(WizardEvent::UrgeFaded),
        "acted" => Command::Wizard(WizardEvent::ActedOnUrge),
        "reset" => Command::Reset,
        "history" => Command::History,
        "progress" => Command::Progress,
        "plan" => {
            let (category, triggers) = rest
                .split_once(char::is_whitespace)
                .ok_or("usage: plan <category> <triggers...>")?;
            Command::Plan { category: category.to_string(), triggers: triggers.trim().to_string() }
        }
        "surf" => {
            let (urge_type, intensity) = rest
                .rsplit_once(char::is_whitespace)
                .ok_or("usage: surf <urge type> <intensity>")?;
            let intensity = intensity
                .parse()
                .map_err(|_| format!("'{}' is not a number", intensity))?;
            Command::Surf { urge_type: urge_type.trim().to_string(), intensity }
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try `help`", other)),
    };
    Ok(command)
}

fn print_help() {
    println!("Wizard:   aware | type <urge> | intensity <1-10> | next | motivation <1-10> | ability <1-10>");
    println!("          back | suggest [context] | resolved | delay | faded | acted | reset");
    println!("Views:    history | progress");
    println!("Tools:    plan <category> <triggers...> | surf <urge type> <intensity>");
    println!("          help | quit");
}

fn render<H: HistoryStore>(driver: &WizardDriver<H>) {
    let draft = driver.draft();
    match driver.state() {
        WizardState::Initial => {
            println!("\nFeeling an urge? Noticing it is the first step. Type `aware` to begin.");
        }
        WizardState::Classify => {
            let types: Vec<&str> = UrgeType::ALL.iter().map(|t| t.id()).collect();
            println!("\nWhat are you feeling? Let's identify the urge and its strength.");
            println!("  types: {}", types.join(", "));
            println!(
                "  selected: {}  intensity: {}/10",
                draft.urge_type.map(|t| t.label()).unwrap_or("none"),
                draft.intensity
            );
            println!("  `type <urge>`, `intensity <n>`, then `next`");
        }
        WizardState::FoggModel { pending, last_error } => {
            if pending.is_some() {
                println!("\nFinding a micro-action that fits...");
                return;
            }
            println!("\nHow motivated are you to resist, and how able do you feel right now?");
            println!("  motivation: {}/10  ability: {}/10", draft.motivation, draft.ability);
            if let Some(error) = last_error {
                println!("  ! {}", error);
            }
            println!("  `motivation <n>`, `ability <n>`, `suggest [context]` or `back`");
        }
        WizardState::Intervention { result } => {
            println!("\nTry this: {}", result.suggestion);
            println!("  Why: {}", result.rationale);
            println!("  `resolved` if the urge has passed, or `delay` to wait it out for 20 minutes");
        }
        WizardState::Delay { countdown, .. } => {
            println!("\nRide it out. Time left: {}", countdown.mm_ss());
            if let Some(route) = driver.state().linked_route() {
                println!("  More tools: {}", route.path());
            }
            println!("  `faded` if the urge passed, `acted` if you acted on it");
        }
    }
}

fn render_tick<H: HistoryStore>(driver: &WizardDriver<H>) {
    let left = driver.state().time_left();
    if left == 0 {
        println!("Time's up. How did it go? `faded` or `acted`");
    } else if left % 60 == 0 || left <= 10 {
        println!("  {} left", format_mm_ss(left));
    }
}

fn print_history<H: HistoryStore>(history: &H) {
    if history.is_empty() {
        println!("No urges logged yet.");
        return;
    }
    for entry in history.list() {
        println!(
            "  {}  {:<20} intensity {:>2}  {:?}",
            entry.occurred_at.format("%Y-%m-%d %H:%M"),
            entry.urge_type.label(),
            entry.intensity.get(),
            entry.outcome
        );
    }
}

fn print_progress<H: HistoryStore>(history: &H) {
    let entries = history.list();
    let stats = compute_stats(entries.iter().copied());
    println!(
        "Sessions: {}  resisted: {}  acted: {}  resist rate: {:.0}%  mean intensity: {:.1}",
        stats.sessions,
        stats.resisted,
        stats.acted,
        stats.resist_rate * 100.0,
        stats.mean_intensity
    );
    for t in &stats.by_urge_type {
        println!("  {:<20} {} sessions ({} resisted, {} acted)", t.urge_type.label(), t.sessions, t.resisted, t.acted);
    }
    for day in daily_outcomes(entries.iter().copied()) {
        println!("  {}  resisted {}  acted {}", day.day, day.resisted, day.acted);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = GatewayConfig::from_env();
    info!("urgeflow starting. Text generation backend: {}", config.base_url);

    let gateway = LlmGateway::new(config)?;
    let mut driver = WizardDriver::new(Arc::new(gateway), InMemoryHistoryStore::new());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help();
    render(&driver);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }

                match parse_command(&line) {
                    Ok(Command::Wizard(event)) => match driver.dispatch(event) {
                        Ok(()) => render(&driver),
                        Err(e) => println!("! {}", e),
                    },
                    Ok(Command::Reset) => {
                        driver.reset();
                        render(&driver);
                    }
                    Ok(Command::History) => print_history(driver.history()),
                    Ok(Command::Progress) => print_progress(driver.history()),
                    Ok(Command::Plan { category, triggers }) => {
                        println!("Generating your if-then plan...");
                        let input = ImplementationIntentionInput { logged_triggers: triggers, habit_category: category };
                        match driver.implementation_intention(&input).await {
                            ActionResult::Success(plan) => println!("\"{}\"", plan.implementation_intention),
                            ActionResult::Failure(error) => println!("! {}", error),
                        }
                    }
                    Ok(Command::Surf { urge_type, intensity }) => {
                        println!("Preparing an urge-surfing script...");
                        let input = UrgeSurfingInput { urge_type, intensity_before: intensity };
                        match driver.urge_surfing_script(&input).await {
                            ActionResult::Success(out) => {
                                println!("{}", out.script);
                                println!("Intensity after: {}/10 (was {})", out.intensity_after, intensity);
                            }
                            ActionResult::Failure(error) => println!("! {}", error),
                        }
                    }
                    Ok(Command::Help) => print_help(),
                    Ok(Command::Quit) => break,
                    Err(message) => println!("! {}", message),
                }
            }
            result = driver.process_next() => {
                let in_delay = matches!(driver.state(), WizardState::Delay { .. });
                match result {
                    Err(e) => println!("! {}", e),
                    Ok(()) if in_delay => render_tick(&driver),
                    Ok(()) => render(&driver),
                }
            }
        }
    }

    info!("urgeflow shutting down");
    Ok(())
}
