//! Inventory streaming example.
//!
//! This example walks the full certificate inventory page by page using
//! the lazy stream API and reports certificates expiring soon, without
//! ever holding more than one page in memory.
//!
//! Run with: cargo run --example stream_inventory

use certforge_rs::api::CertificatesQueryStream;
use certforge_rs::{CertforgeClient, CertificateStatus, ClientConfig};
use chrono::{Duration, Utc};
use futures_util::StreamExt;

#[tokio::main]
async fn main() -> certforge_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let base_url = std::env::var("CERTFORGE_URL")
        .expect("CERTFORGE_URL environment variable required");
    let customer = std::env::var("CERTFORGE_CUSTOMER")
        .expect("CERTFORGE_CUSTOMER environment variable required");
    let username = std::env::var("CERTFORGE_LOGIN")
        .expect("CERTFORGE_LOGIN environment variable required");
    let password = std::env::var("CERTFORGE_PASSWORD")
        .expect("CERTFORGE_PASSWORD environment variable required");

    let config = ClientConfig::new(base_url, customer);
    let client = CertforgeClient::login(config, username, password)?;

    // Only issued certificates matter for expiry monitoring
    let filter = CertificatesQueryStream {
        status: Some(CertificateStatus::Issued),
        size: Some(100),
        ..Default::default()
    };

    let horizon = Utc::now() + Duration::days(30);
    let mut total = 0u64;
    let mut expiring = 0u64;

    let mut stream = client.certificates().list_stream(Some(filter));
    while let Some(result) = stream.next().await {
        let certificate = result?;
        total += 1;

        if let Some(valid_to) = certificate.valid_to {
            if valid_to <= horizon {
                expiring += 1;
                println!(
                    "  expiring {}: {} (certificate {})",
                    valid_to.format("%Y-%m-%d"),
                    certificate.common_name.as_deref().unwrap_or("<no common name>"),
                    certificate.id
                );
            }
        }
    }

    println!("\nScanned {total} issued certificate(s), {expiring} expiring within 30 days");
    Ok(())
}
