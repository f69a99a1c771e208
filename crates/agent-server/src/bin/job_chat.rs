//! Terminal job search chat
//!
//! Offers to reuse the remembered role/location, runs one search, then keeps
//! paging while the user asks for more.

use std::io::Write as _;

use anyhow::Context as _;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, Message, Session, SessionId};
use job_scout::{JOB_AGENT_PROMPT, JobScout};

const MORE: [&str; 3] = ["yes", "more", "show more"];

type Input = Lines<BufReader<Stdin>>;

async fn ask(input: &mut Input, prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let line = input.next_line().await?.context("stdin closed")?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let provider = agent_runtime::provider_from_env()?;
    let scout = JobScout::from_env()?;
    let agent = AgentBuilder::new()
        .model(provider.default_model())
        .provider(provider)
        .tools(scout.job_tools())
        .system_prompt(JOB_AGENT_PROMPT)
        .build()?;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let user = scout.default_user();

    let remembered = scout.memory().recall_preferences(user).await.pop();
    let reuse = match &remembered {
        Some(pref) => {
            println!("I remember your previous preferences:");
            println!("- {} in {}", pref.role, pref.location);
            let answer = ask(&mut input, "Do you want to see the jobs according to your preferences? (yes/no) ").await?;
            answer.eq_ignore_ascii_case("yes")
        }
        None => false,
    };

    let (role, location) = match remembered {
        Some(pref) if reuse => (pref.role, pref.location),
        _ => (
            ask(&mut input, "Enter job role: ").await?,
            ask(&mut input, "Enter job location: ").await?,
        ),
    };

    let mut session = Session::with_id(SessionId::local()).for_user(user.as_str());
    session
        .conversation
        .push(Message::user(format!("Find {role} jobs in {location}")));

    loop {
        match agent.run(&mut session).await {
            Ok(reply) => println!("{reply}"),
            Err(e) => {
                tracing::error!("Agent error: {}", e);
                println!("{}", e.user_message());
            }
        }

        let answer = ask(&mut input, "\nType 'yes' to see more jobs or 'no' to exit: ").await?;
        if MORE.contains(&answer.to_lowercase().as_str()) {
            session.conversation.push(Message::user("show more jobs"));
        } else {
            println!("Okay, ending job search.");
            break;
        }
    }

    Ok(())
}
