//! Terminal output.
//!
//! Results go to stdout, notices about failures to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use cartlane_core::{CartView, Product};
use cartlane_storefront::error::{Notice, Severity};
use cartlane_storefront::search::SearchState;
use cartlane_storefront::session::Session;

use crate::commands::CommandError;

pub fn products(products: &[Product]) {
    for product in products {
        println!(
            "{:<18} {:<32} {:<14} {:>10}  {}",
            product.id,
            product.name,
            product.category,
            product.cost.to_string(),
            stars(product.stars()),
        );
    }
}

pub fn cart(view: &CartView) {
    if view.is_empty() {
        println!("Cart is empty. Add an item to the cart, it will show up here");
        return;
    }

    for item in &view.items {
        println!(
            "{:<18} {:<32} {:>4} x {:>10} = {:>10}",
            item.product.id,
            item.product.name,
            item.qty,
            item.product.cost.to_string(),
            item.line_total().to_string(),
        );
    }
    println!("Items: {}", view.total_quantity);
    println!("Order total: {}", view.total_value);
}

pub fn search_state(state: &SearchState) {
    match state {
        SearchState::Idle => {}
        SearchState::Results { text, products: found } => {
            println!("Results for \"{text}\":");
            products(found);
        }
        SearchState::NoResults { text } => println!("No products found for \"{text}\""),
        SearchState::Failed { notice: failure, .. } => notice(failure),
    }
}

pub fn session(session: &Session) {
    match (&session.username, session.is_authenticated()) {
        (Some(username), true) => {
            let balance = session
                .balance
                .map_or_else(|| "-".to_string(), |b| b.normalize().to_string());
            println!("Logged in as {username} (wallet balance: {balance})");
        }
        _ => println!("Not logged in"),
    }
}

pub fn notice(notice: &Notice) {
    match notice.severity {
        Severity::Info => println!("{}", notice.message),
        Severity::Warning | Severity::Error => eprintln!("{notice}"),
    }
}

pub fn failure(err: &CommandError) {
    let failure = match err {
        CommandError::App(app) => Notice::from(app),
        CommandError::Input(_) => Notice::error(err.to_string()),
    };
    notice(&failure);
}

pub fn prompt(label: &str) {
    eprint!("{label}: ");
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating);
    format!("{}{}", "*".repeat(filled), ".".repeat(5_usize.saturating_sub(filled)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(0), ".....");
        assert_eq!(stars(4), "****.");
        assert_eq!(stars(5), "*****");
    }
}
