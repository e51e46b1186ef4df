use std::env;

/// Bakes WiFi credentials and the local UTC offset from a `.env` file (or
/// the environment) into the binary, so secrets stay out of the source tree.
fn main() {
    let _ = dotenvy::dotenv();
    println!("cargo:rerun-if-changed=../../.env");
    for key in ["WIFI_SSID", "WIFI_PASSWORD", "UTC_OFFSET_MINUTES"] {
        println!("cargo:rerun-if-env-changed={key}");
    }

    let ssid = env::var("WIFI_SSID").unwrap_or_default();
    let password = env::var("WIFI_PASSWORD").unwrap_or_default();
    if ssid.is_empty() {
        println!(
            "cargo:warning=WIFI_SSID is not set; the clock will never sync and stays on the ambient screen"
        );
    }
    println!("cargo:rustc-env=WIFI_SSID={ssid}");
    println!("cargo:rustc-env=WIFI_PASSWORD={password}");

    let minutes: i64 = env::var("UTC_OFFSET_MINUTES")
        .map(|raw| {
            raw.trim()
                .parse()
                .expect("UTC_OFFSET_MINUTES must be a whole number of minutes")
        })
        .unwrap_or(0);
    println!("cargo:rustc-env=UTC_OFFSET_SECONDS={}", minutes * 60);
}
