//! Certificate enrollment example.
//!
//! This example enrolls a PEM-encoded CSR against the first enabled
//! profile and prints the resulting certificate's status.
//!
//! Run with: cargo run --example enroll_certificate -- path/to/request.csr

use certforge_rs::{CertforgeClient, ClientConfig, EnrollmentRequest};

#[tokio::main]
async fn main() -> certforge_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let csr_path = std::env::args()
        .nth(1)
        .expect("usage: enroll_certificate <csr.pem>");
    let csr = std::fs::read_to_string(&csr_path).expect("failed to read CSR file");

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

    // Pick an enabled profile and an organization to enroll under
    let profiles = client.profiles().list().await?;
    let profile = profiles
        .iter()
        .find(|p| p.enabled)
        .expect("no enabled enrollment profiles");

    let organizations = client.organizations().list().await?;
    let organization = organizations.first().expect("no organizations available");

    println!(
        "Enrolling {} against profile '{}' for {}...",
        csr_path, profile.name, organization.name
    );

    let request = EnrollmentRequest::new(csr, profile.id, organization.id)
        .with_term_months(*profile.term_months.first().unwrap_or(&12))
        .with_comment("enrolled via certforge-rs example");

    let enrollment = client.certificates().enroll(&request).await?;
    println!("Enrollment accepted: certificate {}", enrollment.certificate_id);
    if let Some(order_number) = enrollment.order_number {
        println!("Tracked by order {order_number}");
    }

    // Fetch the certificate to see where it landed
    let certificate = client.certificates().get(enrollment.certificate_id).await?;
    println!(
        "Status: {:?} (common name: {})",
        certificate.status,
        certificate.common_name.as_deref().unwrap_or("from CSR")
    );

    Ok(())
}
