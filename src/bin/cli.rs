//! Smita CLI
//!
//! Command-line client for the reservation API:
//! - Browse tables, time slots and the menu
//! - Book a table through the wizard
//! - Manage reservations as an admin
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "smita-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the Smita reservation service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Admin email for dashboard commands
    #[arg(long, default_value = "admin@smitarestaurant.com", global = true)]
    pub email: String,

    /// Admin password for dashboard commands
    #[arg(long, default_value = "admin123", global = true)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show service status
    Status,

    /// List tables
    Tables,

    /// List bookable time slots
    Slots,

    /// Show the menu
    Menu {
        /// Category (Appetizers, Main Courses, Desserts, Beverages, All)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Book a table
    Book {
        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Time slot (HH:MM)
        #[arg(short, long)]
        time: String,
        /// Party size
        #[arg(short, long, default_value = "2")]
        party: u32,
        /// Table id (default: first table that fits)
        #[arg(long)]
        table: Option<u32>,
        /// Customer name
        #[arg(long)]
        name: String,
        /// Customer email
        #[arg(long)]
        customer_email: String,
        /// Customer phone
        #[arg(long)]
        phone: String,
    },

    /// List all reservations (admin)
    Reservations,

    /// Show the dashboard for a date (admin)
    Dashboard {
        /// Date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Change a reservation's status (admin)
    SetStatus {
        /// Reservation id
        id: i64,
        /// confirmed, pending or cancelled
        status: String,
    },

    /// Delete a reservation (admin)
    Delete {
        /// Reservation id
        id: i64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api/v1", cli.api_url.trim_end_matches('/'));

    match &cli.command {
        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: Value = resp.json().await?;

                    println!(
                        "{} (v{})",
                        health["restaurant"].as_str().unwrap_or("Smita"),
                        health["version"].as_str().unwrap_or("?")
                    );
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!("Reservations loaded: {}", health["reservations"].as_u64().unwrap_or(0));
                    println!("Booking sessions: {}", health["booking_sessions"].as_u64().unwrap_or(0));

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to the Smita API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin smita");
                    std::process::exit(1);
                }
            }
        }

        Commands::Tables => {
            let data = get_json(&client, &format!("{}/tables", api), None).await?;
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_tables(&data["tables"]);
            }
        }

        Commands::Slots => {
            let data = get_json(&client, &format!("{}/time-slots", api), None).await?;
            let slots: Vec<&str> = data["time_slots"]
                .as_array()
                .map(|a| a.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();

            println!("Time slots: {}", slots.join(", "));
            println!(
                "Party size: 1-{} (default {})",
                data["max_party_size"].as_u64().unwrap_or(0),
                data["default_party_size"].as_u64().unwrap_or(0)
            );
        }

        Commands::Menu { category } => {
            let mut url = format!("{}/menu", api);
            if let Some(category) = category {
                url.push_str(&format!("?category={}", category.replace(' ', "-")));
            }
            let data = get_json(&client, &url, None).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("{:<4} {:<24} {:<14} {:>6} {:>6}", "ID", "Dish", "Category", "Price", "Rating");
                println!("{}", "-".repeat(58));
                for item in data["items"].as_array().into_iter().flatten() {
                    let marker = if item["signature"].as_bool().unwrap_or(false) { " *" } else { "" };
                    println!(
                        "{:<4} {:<24} {:<14} {:>6} {:>6.1}{}",
                        item["id"].as_u64().unwrap_or(0),
                        item["name"].as_str().unwrap_or("-"),
                        item["category"].as_str().unwrap_or("-"),
                        format!("${}", item["price"].as_u64().unwrap_or(0)),
                        item["rating"].as_f64().unwrap_or(0.0),
                        marker
                    );
                }
                println!();
                println!("* signature dish");
            }
        }

        Commands::Book {
            date,
            time,
            party,
            table,
            name,
            customer_email,
            phone,
        } => {
            let session = post_json(&client, &format!("{}/bookings", api), None, None).await?;
            let booking = session["booking_id"]
                .as_str()
                .context("Server did not return a booking id")?
                .to_string();
            let base = format!("{}/bookings/{}", api, booking);

            let step = post_json(
                &client,
                &format!("{}/date-time", base),
                Some(json!({"date": date, "time_slot": time, "party_size": party})),
                None,
            )
            .await?;

            if step["no_tables_available"].as_bool().unwrap_or(false) {
                bail!("No tables available for a party of {} on {} at {}", party, date, time);
            }

            let table_id = match table {
                Some(id) => *id,
                None => step["candidate_tables"][0]["id"]
                    .as_u64()
                    .context("No candidate table returned")? as u32,
            };

            post_json(
                &client,
                &format!("{}/table", base),
                Some(json!({"table_id": table_id})),
                None,
            )
            .await?;

            let done = post_json(
                &client,
                &format!("{}/details", base),
                Some(json!({
                    "customer_name": name,
                    "customer_email": customer_email,
                    "customer_phone": phone,
                })),
                None,
            )
            .await?;

            let confirmation = &done["confirmation"];
            println!("Reservation confirmed!");
            println!("  Id: {}", confirmation["id"]);
            println!(
                "  {} at {} for {} (table {})",
                confirmation["date"].as_str().unwrap_or("-"),
                confirmation["time_slot"].as_str().unwrap_or("-"),
                confirmation["party_size"],
                confirmation["table_id"]
            );
        }

        Commands::Reservations => {
            let token = login(&client, &api, &cli.email, &cli.password).await?;
            let data = get_json(&client, &format!("{}/admin/reservations", api), Some(&token)).await;
            logout(&client, &api, &token).await;
            let data = data?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_reservations(&data["reservations"]);
            }
        }

        Commands::Dashboard { date } => {
            let token = login(&client, &api, &cli.email, &cli.password).await?;
            let mut url = format!("{}/admin/dashboard", api);
            if let Some(date) = date {
                url.push_str(&format!("?date={}", date));
            }
            let data = get_json(&client, &url, Some(&token)).await;
            logout(&client, &api, &token).await;
            let data = data?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("Dashboard for {}", data["date"].as_str().unwrap_or("-"));
                println!();
                println!("  Total reservations:     {}", data["total_reservations"]);
                println!("  Confirmed reservations: {}", data["confirmed_reservations"]);
                println!("  Total guests:           {}", data["total_guests"]);
                println!(
                    "  Available tables:       {}/{}",
                    data["available_tables"], data["total_tables"]
                );
                println!();
                print_reservations(&data["reservations"]);
            }
        }

        Commands::SetStatus { id, status } => {
            let token = login(&client, &api, &cli.email, &cli.password).await?;
            let response = client
                .patch(format!("{}/admin/reservations/{}", api, id))
                .bearer_auth(&token)
                .json(&json!({"status": status.to_lowercase()}))
                .send()
                .await;
            logout(&client, &api, &token).await;
            let updated = check(response?).await?;

            println!(
                "Reservation {} is now {}",
                id,
                updated["status"].as_str().unwrap_or(status)
            );
        }

        Commands::Delete { id } => {
            let token = login(&client, &api, &cli.email, &cli.password).await?;
            let response = client
                .delete(format!("{}/admin/reservations/{}", api, id))
                .bearer_auth(&token)
                .send()
                .await;
            logout(&client, &api, &token).await;
            check(response?).await?;

            println!("Reservation {} deleted", id);
        }

        Commands::Config { output } => {
            let config = smita::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Turn a non-success response into an error carrying the server's message
async fn check(response: reqwest::Response) -> anyhow::Result<Value> {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(text);
        bail!("Request failed ({}): {}", status, message);
    }

    if text.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}

async fn get_json(client: &reqwest::Client, url: &str, token: Option<&str>) -> anyhow::Result<Value> {
    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    check(request.send().await?).await
}

async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> anyhow::Result<Value> {
    let mut request = client.post(url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    check(request.send().await?).await
}

async fn login(client: &reqwest::Client, api: &str, email: &str, password: &str) -> anyhow::Result<String> {
    let session = post_json(
        client,
        &format!("{}/auth/login", api),
        Some(json!({"email": email, "password": password})),
        None,
    )
    .await
    .context("Admin login failed")?;

    session["token"]
        .as_str()
        .map(str::to_string)
        .context("Server did not return a session token")
}

/// End the admin session; a failure only costs the server a sweep
async fn logout(client: &reqwest::Client, api: &str, token: &str) {
    if let Err(e) = post_json(client, &format!("{}/auth/logout", api), None, Some(token)).await {
        eprintln!("Warning: logout failed: {}", e);
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_tables(tables: &Value) {
    println!("{:<4} {:<10} {:>8} {:<14} {}", "ID", "Name", "Capacity", "Location", "Status");
    println!("{}", "-".repeat(52));

    for table in tables.as_array().into_iter().flatten() {
        let status = if table["available"].as_bool().unwrap_or(false) {
            "Available"
        } else {
            "Occupied"
        };
        println!(
            "{:<4} {:<10} {:>8} {:<14} {}",
            table["id"].as_u64().unwrap_or(0),
            table["name"].as_str().unwrap_or("-"),
            table["capacity"].as_u64().unwrap_or(0),
            table["location"].as_str().unwrap_or("-"),
            status
        );
    }
}

fn print_reservations(reservations: &Value) {
    let rows = match reservations.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("No reservations");
            return;
        }
    };

    println!(
        "{:<14} {:<20} {:<11} {:<6} {:<10} {:>5} {}",
        "ID", "Customer", "Date", "Time", "Table", "Party", "Status"
    );
    println!("{}", "-".repeat(80));

    for r in rows {
        println!(
            "{:<14} {:<20} {:<11} {:<6} {:<10} {:>5} {}",
            r["id"].as_i64().unwrap_or(0),
            r["customer_name"].as_str().unwrap_or("-"),
            r["date"].as_str().unwrap_or("-"),
            r["time_slot"].as_str().unwrap_or("-"),
            r["table_name"].as_str().unwrap_or("-"),
            r["party_size"].as_u64().unwrap_or(0),
            r["status"].as_str().unwrap_or("-")
        );
    }
}
