//! Interactive menu over the API client.
//!
//! One `dialoguer` select loop; every entry maps to one API operation.
//! Required fields re-prompt until valid, optional fields accept blank to
//! skip, and destructive operations ask for confirmation first.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use serde_json::{json, Value};

use crate::api::{ApiClient, ApiResponse};

const MENU: &[&str] = &[
    "Create User",
    "Get All Users",
    "Get User by ID",
    "Update User",
    "Delete User",
    "Create Product",
    "Get All Products",
    "Get Product by ID",
    "Update Product",
    "Delete Product",
    "Create Order",
    "Get User Orders",
    "Get Order Products",
    "Add Product to Order",
    "Remove Product from Order",
    "Update Order Status",
    "Get System Statistics",
    "Run Complete Test Suite",
    "Exit",
];

const VALID_STATUSES: &[&str] = &["pending", "confirmed", "shipped", "delivered"];

/// Main interactive loop. Errors from a single operation are printed and
/// the loop continues; only "Exit" ends it.
pub fn main_menu(client: &ApiClient) -> Result<()> {
    loop {
        println!();
        let selection = Select::new()
            .with_prompt("E-Commerce API Client")
            .items(MENU)
            .default(0)
            .interact()?;

        let outcome = match selection {
            0 => create_user(client),
            1 => list_users(client),
            2 => get_user(client),
            3 => update_user(client),
            4 => delete_user(client),
            5 => create_product(client),
            6 => list_products(client),
            7 => get_product(client),
            8 => update_product(client),
            9 => delete_product(client),
            10 => create_order(client),
            11 => user_orders(client),
            12 => order_products(client),
            13 => add_product_to_order(client),
            14 => remove_product_from_order(client),
            15 => update_order_status(client),
            16 => system_stats(client),
            17 => run_test_suite(client),
            _ => {
                println!("Goodbye!");
                return Ok(());
            }
        };

        if let Err(e) = outcome {
            println!("Error: {e}");
        }
    }
}

/// Print a response the way every operation reports it: status code first,
/// then the pretty-printed body.
fn print_response(response: &ApiResponse) {
    println!("\nStatus Code: {}", response.status);
    let body = serde_json::to_string_pretty(&response.body).unwrap_or_default();
    if response.is_success() {
        println!("Success");
        println!("Response: {body}");
    } else {
        println!("Error Response:");
        println!("Details: {body}");
    }
}

fn required_text(prompt: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()?)
}

fn optional_text(prompt: &str) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(format!("{prompt} (optional, blank to skip)"))
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim().to_string();
    Ok(if value.is_empty() { None } else { Some(value) })
}

fn prompt_id(prompt: &str) -> Result<i64> {
    Ok(Input::<i64>::new().with_prompt(prompt).interact_text()?)
}

fn prompt_price(prompt: &str) -> Result<f64> {
    Ok(Input::<f64>::new().with_prompt(prompt).interact_text()?)
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

// USER OPERATIONS

fn create_user(client: &ApiClient) -> Result<()> {
    println!("\nCreating New User");
    let body = json!({
        "name": required_text("Name")?,
        "email": required_text("Email")?,
        "address": required_text("Address")?,
        "phone": required_text("Phone")?,
    });
    print_response(&client.create_user(&body)?);
    Ok(())
}

fn list_users(client: &ApiClient) -> Result<()> {
    println!("\nGetting All Users");
    print_response(&client.list_users()?);
    Ok(())
}

fn get_user(client: &ApiClient) -> Result<()> {
    let id = prompt_id("User ID")?;
    print_response(&client.get_user(id)?);
    Ok(())
}

fn update_user(client: &ApiClient) -> Result<()> {
    println!("\nUpdating User");
    let id = prompt_id("User ID to update")?;
    let mut body = json!({
        "name": required_text("New name")?,
        "email": required_text("New email")?,
    });
    if let Some(address) = optional_text("New address")? {
        body["address"] = json!(address);
    }
    if let Some(phone) = optional_text("New phone")? {
        body["phone"] = json!(phone);
    }
    print_response(&client.update_user(id, &body)?);
    Ok(())
}

fn delete_user(client: &ApiClient) -> Result<()> {
    let id = prompt_id("User ID to delete")?;
    if !confirm(&format!("Are you sure you want to delete user {id}?"))? {
        println!("Deletion cancelled");
        return Ok(());
    }
    print_response(&client.delete_user(id)?);
    Ok(())
}

// PRODUCT OPERATIONS

fn create_product(client: &ApiClient) -> Result<()> {
    println!("\nCreating New Product");
    let mut body = json!({
        "product_name": required_text("Product name")?,
        "price": prompt_price("Price")?,
        "stock_quantity": prompt_id("Stock quantity")?,
    });
    if let Some(description) = optional_text("Description")? {
        body["description"] = json!(description);
    }
    if let Some(category) = optional_text("Category")? {
        body["category"] = json!(category);
    }
    print_response(&client.create_product(&body)?);
    Ok(())
}

fn list_products(client: &ApiClient) -> Result<()> {
    println!("\nGetting All Products");
    let mut params: Vec<(&str, String)> = Vec::new();
    if confirm("Use filters?")? {
        if let Some(category) = optional_text("Filter by category")? {
            params.push(("category", category));
        }
        if let Some(min_price) = optional_text("Minimum price")? {
            params.push(("min_price", min_price));
        }
        if let Some(max_price) = optional_text("Maximum price")? {
            params.push(("max_price", max_price));
        }
    }
    print_response(&client.list_products(&params)?);
    Ok(())
}

fn get_product(client: &ApiClient) -> Result<()> {
    let id = prompt_id("Product ID")?;
    print_response(&client.get_product(id)?);
    Ok(())
}

fn update_product(client: &ApiClient) -> Result<()> {
    println!("\nUpdating Product");
    let id = prompt_id("Product ID to update")?;
    let mut body = json!({
        "product_name": required_text("New product name")?,
        "price": prompt_price("New price")?,
    });
    if let Some(description) = optional_text("New description")? {
        body["description"] = json!(description);
    }
    if let Some(stock) = optional_text("New stock quantity")? {
        let stock: i64 = stock
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid stock quantity"))?;
        body["stock_quantity"] = json!(stock);
    }
    if let Some(category) = optional_text("New category")? {
        body["category"] = json!(category);
    }
    print_response(&client.update_product(id, &body)?);
    Ok(())
}

fn delete_product(client: &ApiClient) -> Result<()> {
    let id = prompt_id("Product ID to delete")?;
    if !confirm(&format!("Are you sure you want to delete product {id}?"))? {
        println!("Deletion cancelled");
        return Ok(());
    }
    print_response(&client.delete_product(id)?);
    Ok(())
}

// ORDER OPERATIONS

/// Parse a comma-separated product id selection against the listed set.
/// `"none"` or blank means an empty order.
fn parse_selection(input: &str, available: &[i64]) -> Result<Vec<i64>, String> {
    let input = input.trim().to_lowercase();
    if input.is_empty() || input == "none" {
        return Ok(Vec::new());
    }

    let mut selected = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        let id: i64 = part
            .parse()
            .map_err(|_| "Invalid format. Use numbers separated by commas.".to_string())?;
        if !available.contains(&id) {
            return Err(format!("Invalid product ID: {id}"));
        }
        if !selected.contains(&id) {
            selected.push(id);
        }
    }
    Ok(selected)
}

fn print_product_table(products: &[Value]) {
    println!("{:-<70}", "");
    println!(
        "{:<5} {:<20} {:<10} {:<8} {:<15}",
        "ID", "Name", "Price", "Stock", "Category"
    );
    println!("{:-<70}", "");
    for product in products {
        let name = product["product_name"].as_str().unwrap_or("?");
        let name: String = name.chars().take(19).collect();
        let category = product["category"].as_str().unwrap_or("N/A");
        let category: String = category.chars().take(14).collect();
        println!(
            "{:<5} {:<20} ${:<9.2} {:<8} {:<15}",
            product["id"].as_i64().unwrap_or(0),
            name,
            product["price"].as_f64().unwrap_or(0.0),
            product["stock_quantity"].as_i64().unwrap_or(0),
            category,
        );
    }
    println!("{:-<70}", "");
}

/// Composite flow: list products, take a comma-separated selection, create
/// the order, then add the selected products one call at a time.
fn create_order(client: &ApiClient) -> Result<()> {
    println!("\nCreating New Order");
    let user_id = prompt_id("User ID for the order")?;

    println!("\nAvailable Products:");
    let listing = client.list_products(&[])?;
    let Some(products) = listing.body.as_array().cloned() else {
        println!("No products available. Create some products first!");
        return Ok(());
    };
    print_product_table(&products);

    let available: Vec<i64> = products
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect();

    println!("Enter product IDs separated by commas (e.g., 1,3,5) or 'none' for an empty order:");
    let selection: String = Input::new()
        .with_prompt("Product IDs")
        .allow_empty(true)
        .interact_text()?;

    let selected = match parse_selection(&selection, &available) {
        Ok(selected) => selected,
        Err(message) => {
            println!("{message}");
            return Ok(());
        }
    };

    println!("\nCreating order for user {user_id}...");
    let order_response = client.create_order(&json!({ "user_id": user_id }))?;
    print_response(&order_response);
    let Some(order_id) = order_response.body["id"].as_i64() else {
        println!("Failed to create order");
        return Ok(());
    };

    if selected.is_empty() {
        println!("\nEmpty order created. You can add products later using 'Add Product to Order'.");
        return Ok(());
    }

    println!("\nAdding {} products to order...", selected.len());
    let mut successful = 0;
    for product_id in &selected {
        let response = client.add_product_to_order(order_id, *product_id)?;
        match response.body["message"].as_str() {
            Some(message) if response.is_success() => {
                println!("  {message}");
                successful += 1;
            }
            _ => println!("  Failed to add product {product_id}"),
        }
    }
    println!(
        "\nSuccessfully added {successful}/{} products to order!",
        selected.len()
    );

    println!("\nFinal Order Summary:");
    print_response(&client.order_products(order_id)?);
    Ok(())
}

fn user_orders(client: &ApiClient) -> Result<()> {
    let user_id = prompt_id("User ID")?;
    print_response(&client.user_orders(user_id)?);
    Ok(())
}

fn order_products(client: &ApiClient) -> Result<()> {
    let order_id = prompt_id("Order ID")?;
    print_response(&client.order_products(order_id)?);
    Ok(())
}

fn add_product_to_order(client: &ApiClient) -> Result<()> {
    let order_id = prompt_id("Order ID")?;
    let product_id = prompt_id("Product ID to add")?;
    print_response(&client.add_product_to_order(order_id, product_id)?);
    Ok(())
}

fn remove_product_from_order(client: &ApiClient) -> Result<()> {
    let order_id = prompt_id("Order ID")?;
    let product_id = prompt_id("Product ID to remove")?;
    print_response(&client.remove_product_from_order(order_id, product_id)?);
    Ok(())
}

// EXTRA OPERATIONS

fn update_order_status(client: &ApiClient) -> Result<()> {
    println!("\nUpdating Order Status");
    let order_id = prompt_id("Order ID")?;
    let status = VALID_STATUSES[Select::new()
        .with_prompt("New status")
        .items(VALID_STATUSES)
        .default(0)
        .interact()?];
    print_response(&client.update_order_status(order_id, status)?);
    Ok(())
}

fn system_stats(client: &ApiClient) -> Result<()> {
    println!("\nGetting System Statistics");
    print_response(&client.system_stats()?);
    Ok(())
}

// AUTOMATED TESTING

/// Scripted end-to-end pass over every endpoint with sample data.
fn run_test_suite(client: &ApiClient) -> Result<()> {
    if !confirm("This will create sample data. Continue?")? {
        return Ok(());
    }

    println!("\nRunning Complete Test Suite");
    println!("{:=<60}", "");

    // Unique email suffix so repeated runs do not collide.
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    println!("\n1. Creating sample users...");
    let sample_users = [
        json!({
            "name": "Test User 1",
            "email": format!("testuser1_{suffix}@email.com"),
            "address": "123 Test Street, Test City, TS 12345",
            "phone": "555-0001",
        }),
        json!({
            "name": "Test User 2",
            "email": format!("testuser2_{suffix}@email.com"),
            "address": "456 Sample Ave, Sample City, SC 67890",
            "phone": "555-0002",
        }),
    ];
    let mut user_ids = Vec::new();
    for user in &sample_users {
        println!("Creating user: {}", user["name"]);
        let response = client.create_user(user)?;
        print_response(&response);
        if let Some(id) = response.body["id"].as_i64() {
            user_ids.push(id);
        }
    }

    println!("\n2. Creating sample products...");
    let sample_products = [
        json!({
            "product_name": "Test Laptop",
            "price": 999.99,
            "description": "High-performance test laptop",
            "stock_quantity": 10,
            "category": "Electronics",
        }),
        json!({
            "product_name": "Test Mouse",
            "price": 29.99,
            "description": "Wireless test mouse",
            "stock_quantity": 50,
            "category": "Electronics",
        }),
        json!({
            "product_name": "Test Coffee Mug",
            "price": 12.99,
            "description": "Ceramic test mug",
            "stock_quantity": 100,
            "category": "Home",
        }),
    ];
    let mut product_ids = Vec::new();
    for product in &sample_products {
        println!("Creating product: {}", product["product_name"]);
        let response = client.create_product(product)?;
        print_response(&response);
        if let Some(id) = response.body["id"].as_i64() {
            product_ids.push(id);
        }
    }

    println!("\n3. Getting all users...");
    print_response(&client.list_users()?);

    println!("\n4. Getting all products...");
    print_response(&client.list_products(&[])?);

    println!("\n5. Creating orders...");
    let mut order_ids = Vec::new();
    for user_id in &user_ids {
        let response = client.create_order(&json!({ "user_id": user_id }))?;
        print_response(&response);
        if let Some(id) = response.body["id"].as_i64() {
            order_ids.push(id);
        }
    }

    println!("\n6. Adding products to orders...");
    for order_id in &order_ids {
        for product_id in product_ids.iter().take(2) {
            print_response(&client.add_product_to_order(*order_id, *product_id)?);
        }
    }

    println!("\n7. Getting order details...");
    for order_id in &order_ids {
        print_response(&client.order_products(*order_id)?);
    }

    println!("\n8. Updating order statuses...");
    if let Some(first) = order_ids.first() {
        print_response(&client.update_order_status(*first, "confirmed")?);
    }

    println!("\n9. Getting system statistics...");
    print_response(&client.system_stats()?);

    println!("\nComplete test suite finished!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_accepts_listed_ids() {
        assert_eq!(parse_selection("1,3,5", &[1, 2, 3, 4, 5]), Ok(vec![1, 3, 5]));
        assert_eq!(parse_selection(" 2 , 4 ", &[2, 4]), Ok(vec![2, 4]));
    }

    #[test]
    fn selection_none_or_blank_is_empty() {
        assert_eq!(parse_selection("none", &[1]), Ok(Vec::new()));
        assert_eq!(parse_selection("  ", &[1]), Ok(Vec::new()));
        assert_eq!(parse_selection("", &[]), Ok(Vec::new()));
    }

    #[test]
    fn selection_rejects_unlisted_ids() {
        assert!(parse_selection("7", &[1, 2, 3]).is_err());
    }

    #[test]
    fn selection_rejects_non_numeric_input() {
        assert!(parse_selection("1,abc", &[1, 2]).is_err());
    }

    #[test]
    fn selection_deduplicates() {
        assert_eq!(parse_selection("1,1,2", &[1, 2]), Ok(vec![1, 2]));
    }
}
