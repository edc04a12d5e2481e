//! Entrypoint for the interactive client.
//!
//! Creates an API client from the environment, probes the service once,
//! then hands control to the menu loop.

use storefront_cli::api::ApiClient;
use storefront_cli::ui::main_menu;

fn main() -> anyhow::Result<()> {
    let client = ApiClient::from_env()?;

    println!("Starting E-Commerce API Client...");
    println!("API base URL: {}", client.base_url());

    match client.home() {
        Ok(response) if response.is_success() => {
            println!("Connected to API successfully!");
        }
        Ok(_) => println!("API connection established but got unexpected response"),
        Err(e) => println!("{e}"),
    }

    main_menu(&client)
}
