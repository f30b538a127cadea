// src/main.rs

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::error::Error;

// Response types
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct PersonRecord {
    name: String,
    national_id: String,
}

#[derive(Debug, Deserialize)]
struct OrganizeResponse {
    count: usize,
    records: Vec<PersonRecord>,
}

#[derive(Debug, Deserialize)]
struct PresenceResponse {
    reporting_date: Option<String>,
    total_presence: usize,
    subgroup_presence: usize,
    available_dates: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    report: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let base_url =
        std::env::var("CCOS_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let client = Client::new();

    // Test 1: Health check
    println!("\n🔍 Testing health check endpoint...");
    let health_response = client
        .get(format!("{}/health", base_url))
        .send()
        .await?
        .json::<HealthResponse>()
        .await?;
    println!("Health check response: {:?}", health_response.status);

    // Test 2: List organizer
    println!("\n🔍 Testing list organizer...");
    let organized = client
        .post(format!("{}/api/organize", base_url))
        .json(&json!({
            "text": "LISTA DE PRESENCA\nNOME: MARIA SOUZA CPF 529.982.247-25\nJOSE LIMA 12345678900"
        }))
        .send()
        .await?
        .json::<OrganizeResponse>()
        .await?;
    println!("Organized {} records", organized.count);
    for record in &organized.records {
        println!("  {} [{}]", record.name, record.national_id);
    }

    // Test 3: Presence for a manager
    println!("\n🔍 Testing presence aggregation...");
    let presence = client
        .post(format!("{}/api/presence", base_url))
        .json(&json!({
            "events": [
                {"name": "JOAO", "company": "B11", "unit": "4 ELOS RJ", "date": "2024-01-10", "time": "08:15"},
                {"name": "JOAO", "company": "B11", "unit": "4 ELOS RJ", "date": "2024-01-10", "time": "08:47"},
                {"name": "MARIA", "company": "PROPRIO", "unit": "4 ELOS RJ", "date": "2024-01-10", "time": "09:02"}
            ],
            "user": {"role": "manager", "allowed_warehouses": ["4 ELOS"]}
        }))
        .send()
        .await?
        .json::<PresenceResponse>()
        .await?;
    println!(
        "Presence on {:?}: {} people ({} partner), dates {:?}",
        presence.reporting_date,
        presence.total_presence,
        presence.subgroup_presence,
        presence.available_dates
    );

    // Test 4: Shift report
    println!("\n🔍 Testing shift report...");
    let report = client
        .post(format!("{}/api/report", base_url))
        .json(&json!({
            "cameras": [
                {"uuid": "c1", "id": "C1", "name": "CAM DOCA 1", "location": "Doca 1", "warehouse": "4 ELOS RJ", "status": "OFFLINE"}
            ],
            "generated_at": "2024-01-10T18:30:00"
        }))
        .send()
        .await?
        .json::<ReportResponse>()
        .await?;
    println!("{}", report.report);

    println!("\n✅ All tests completed");
    Ok(())
}
