//! Basic authentication example.
//!
//! This example demonstrates how to authenticate with the CertForge API
//! and list the profiles and organizations visible to the customer.
//!
//! Run with: cargo run --example basic_usage

use certforge_rs::{CertforgeClient, ClientConfig};

#[tokio::main]
async fn main() -> certforge_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Get connection details from environment variables
    let base_url = std::env::var("CERTFORGE_URL")
        .expect("CERTFORGE_URL environment variable required");
    let customer = std::env::var("CERTFORGE_CUSTOMER")
        .expect("CERTFORGE_CUSTOMER environment variable required");
    let username = std::env::var("CERTFORGE_LOGIN")
        .expect("CERTFORGE_LOGIN environment variable required");
    let password = std::env::var("CERTFORGE_PASSWORD")
        .expect("CERTFORGE_PASSWORD environment variable required");

    println!("Connecting to {base_url}...");

    let config = ClientConfig::new(base_url, customer).with_concurrency_limit(4);
    let client = CertforgeClient::login(config, username, password)?;

    // List enrollment profiles
    let profiles = client.profiles().list().await?;
    println!("\nFound {} profile(s):", profiles.len());

    for profile in &profiles {
        println!(
            "  - [{}] {} (terms: {:?} months, enabled: {})",
            profile.id, profile.name, profile.term_months, profile.enabled
        );
    }

    // List organizations
    let organizations = client.organizations().list().await?;
    println!("\nFound {} organization(s):", organizations.len());

    for organization in &organizations {
        println!(
            "  - [{}] {} ({})",
            organization.id,
            organization.name,
            organization.country.as_deref().unwrap_or("no country on file")
        );
    }

    println!("\nDone!");
    Ok(())
}
