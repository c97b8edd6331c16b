mod actor_framework;
mod app_system;
mod clients;
mod domain;
mod error;
mod generator;
mod mock_service;
mod suite;

#[cfg(test)]
mod mock_framework;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Instrument};

use crate::app_system::{setup_tracing, Cli, SuiteConfig};
use crate::clients::UsersClient;
use crate::domain::UserStatus;
use crate::generator::{random_user, UserOptions};
use crate::mock_service::MockUsersService;
use crate::suite::Suite;

const MOCK_TOKEN: &str = "mock-access-token";
const MOCK_SEED_USERS: u32 = 25;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    setup_tracing();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut mock = None;
    let config = if cli.mock {
        let token = cli.token.clone().unwrap_or_else(|| MOCK_TOKEN.to_string());
        let service = MockUsersService::start(token.clone())
            .await
            .context("failed to start mock users service")?;
        let count = MOCK_SEED_USERS.max(cli.page_size * 2);
        let seeded = service
            .seed((0..count).map(|_| random_user(&mut rng, UserOptions::default())))
            .await?;
        info!(seeded = seeded.len(), "Seeded mock users service");
        let config = SuiteConfig::for_mock(&cli, service.base_url(), &token)?;
        mock = Some(service);
        config
    } else {
        SuiteConfig::from_cli(&cli)?
    };

    let client = UsersClient::new(&config.base_url, &config.access_token, config.request_timeout)?;
    let suite = Suite::new(client, config.page_size);
    let test_user = random_user(&mut rng, UserOptions::with_status(UserStatus::Active));
    info!(name = %test_user.name, email = %test_user.email, "Generated test user");

    let span = tracing::info_span!("suite", base_url = %config.base_url);
    let report = suite.run(test_user).instrument(span).await;
    println!("{}", report.render());
    info!(
        user_id = ?report.state.user_id,
        passed = report.passed(),
        failed = report.failed(),
        "Suite finished"
    );

    if let Some(service) = mock {
        service.shutdown().await;
    }

    if report.is_success() {
        info!("All checks passed");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
