//! An api for checking whether a digit string is a chunk of the reference sequence.

#![warn(clippy::all, clippy::pedantic)]

#[macro_use]
extern crate rocket;

mod helpers;

use digits_common::{CheckResponse, DEFAULT_ARTIFACT_PATH, LookupSet};
use helpers::{ApiErrorBody, CorsFairing, RequestTimingFairing, internal_error, not_found_error};
use rocket::fairing::AdHoc;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Check a digit string. A missing `digits` parameter is checked as the empty string;
/// when it repeats, the first value is used.
#[get("/check?<digits>")]
fn check(digits: Option<Vec<&str>>, lookup: &State<LookupSet>) -> Json<CheckResponse> {
    let first = digits.as_deref().and_then(<[&str]>::first).copied();
    let result = lookup.check(first.unwrap_or_default());
    Json(CheckResponse { result })
}

#[catch(404)]
fn not_found() -> Json<ApiErrorBody> {
    not_found_error("The requested resource could not be found.")
}

#[catch(500)]
fn internal() -> Json<ApiErrorBody> {
    internal_error("The server encountered an internal error.")
}

/// Read the artifact named by the `artifact_path` config key and manage the set.
/// Ignition fails if the artifact cannot be loaded, so no check is served without it.
async fn load_lookup_set(rocket: Rocket<Build>) -> Result<Rocket<Build>, Rocket<Build>> {
    let path: PathBuf = rocket
        .figment()
        .extract_inner("artifact_path")
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARTIFACT_PATH));

    match LookupSet::from_path(&path) {
        Ok(lookup) => {
            tracing::info!(
                path = %path.display(),
                unique_hashes = lookup.len(),
                "Loaded lookup set"
            );
            Ok(rocket.manage(lookup))
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to load lookup set");
            Err(rocket)
        }
    }
}

/// Everything but the lookup set.
fn mount(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(RequestTimingFairing)
        .attach(CorsFairing)
        .mount("/api", routes![check])
        .register("/", catchers![not_found, internal])
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a global subscriber may already be installed
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[launch]
fn rocket() -> _ {
    init_tracing();
    mount(rocket::build()).attach(AdHoc::try_on_ignite("Lookup set", load_lookup_set))
}
