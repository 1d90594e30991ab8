//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `apartment_core` linkage.
//! - With the `demo` argument, seed a sample rental graph, save it and print
//!   every persisted entity of each type.

use apartment_core::{
    init_logging, open_configured, Apartment, CoreConfig, EntityRepository, Owner, PersonInfo,
    RentalGraph, Review, Reviewer, SqliteApartmentRepository, SqliteOwnerRepository,
    SqliteReviewRepository, SqliteReviewerRepository,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("apartment_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("apartment_core ping={}", apartment_core::ping());
    println!("apartment_core version={}", apartment_core::core_version());

    if std::env::args().nth(1).as_deref() != Some("demo") {
        return Ok(());
    }

    let config = CoreConfig::from_env()?;
    if let Some(log) = &config.log {
        init_logging(log)?;
    }
    let conn = open_configured(&config.db)?;

    seed(&conn)?;
    print_all(&conn)?;
    Ok(())
}

fn seed(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let mut graph = RentalGraph::new();

    let owner = graph.insert_owner({
        let mut owner = Owner::new(PersonInfo::new("John Doe", "john.doe@example.com", 45));
        owner.is_active = true;
        owner.registration_date = NaiveDate::from_ymd_opt(2021, 3, 15);
        owner.days_as_owner = 1200;
        owner
    });
    let downtown = graph.insert_apartment({
        let mut apartment = Apartment::default();
        apartment.price = Some(1500);
        apartment.area = Some(85);
        apartment.bedroom_count = Some(2);
        apartment.bathroom_count = Some(1);
        apartment.story_count = Some(3);
        apartment.has_hot_water = true;
        apartment.has_heating = true;
        apartment.parking_spaces = 1;
        apartment.is_in_preferred_area = true;
        apartment.furnishing_status = Some("furnished".to_string());
        apartment
    });
    let suburb = graph.insert_apartment({
        let mut apartment = Apartment::default();
        apartment.price = Some(950);
        apartment.area = Some(60);
        apartment.bedroom_count = Some(1);
        apartment.bathroom_count = Some(1);
        apartment.story_count = Some(1);
        apartment.has_basement = true;
        apartment.furnishing_status = Some("unfurnished".to_string());
        apartment
    });
    graph.add_apartment(owner, downtown)?;
    graph.add_apartment(owner, suburb)?;

    let reviewer = graph.insert_reviewer(Reviewer::new(PersonInfo::new(
        "Ana Torres",
        "ana.torres@example.com",
        28,
    )));
    let first = graph.insert_review(Review::rated(5, "Bright and quiet."));
    let second = graph.insert_review(Review::rated(3, "Good value, noisy street."));
    graph.add_review_to_reviewer(reviewer, first)?;
    graph.add_review_to_reviewer(reviewer, second)?;
    graph.add_review_to_apartment(downtown, first)?;
    graph.add_review_to_apartment(suburb, second)?;

    SqliteOwnerRepository::try_new(conn)?.save(&mut graph, owner)?;
    SqliteReviewerRepository::try_new(conn)?.save(&mut graph, reviewer)?;
    log::info!("event=demo_seed module=cli status=ok");
    Ok(())
}

fn print_all(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let mut graph = RentalGraph::new();

    let keys = SqliteOwnerRepository::try_new(conn)?.find_all(&mut graph)?;
    let owners: Vec<&Owner> = keys.iter().filter_map(|key| graph.owner(*key)).collect();
    print_listing("Owners", &owners)?;

    let keys = SqliteReviewerRepository::try_new(conn)?.find_all(&mut graph)?;
    let reviewers: Vec<&Reviewer> = keys.iter().filter_map(|key| graph.reviewer(*key)).collect();
    print_listing("Reviewers", &reviewers)?;

    let keys = SqliteApartmentRepository::try_new(conn)?.find_all(&mut graph)?;
    let apartments: Vec<&Apartment> = keys
        .iter()
        .filter_map(|key| graph.apartment(*key))
        .collect();
    print_listing("Apartments", &apartments)?;

    let keys = SqliteReviewRepository::try_new(conn)?.find_all(&mut graph)?;
    let reviews: Vec<&Review> = keys.iter().filter_map(|key| graph.review(*key)).collect();
    print_listing("Reviews", &reviews)?;
    Ok(())
}

fn print_listing<T: Serialize>(title: &str, items: &[T]) -> Result<(), serde_json::Error> {
    println!("=== {title} in the Database ===");
    for (index, item) in items.iter().enumerate() {
        println!("{}. {}", index + 1, serde_json::to_string(item)?);
    }
    println!();
    Ok(())
}
