//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::auth::models::UserInfo;
use crate::auth::Claims;
use crate::library::{Book, LibraryStats};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

fn role_color(role: &str) -> Color {
    match role {
        "admin" => Color::Red,
        "teacher" => Color::Green,
        _ => Color::White,
    }
}

/// Print a table of registered users
pub fn print_users_table(users: &[UserInfo]) {
    if users.is_empty() {
        info("No users registered. Add one with 'timetable users add'");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Login").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Group").fg(Color::Cyan),
            Cell::new("Role").fg(Color::Cyan),
        ]);

    for user in users {
        table.add_row(vec![
            Cell::new(&user.login),
            Cell::new(&user.name),
            Cell::new(&user.group),
            Cell::new(&user.role).fg(role_color(&user.role)),
        ]);
    }

    println!("{table}");
}

/// Print a table of books
pub fn print_books_table(books: &[Book]) {
    if books.is_empty() {
        info("No books found");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Author").fg(Color::Cyan),
            Cell::new("Genre").fg(Color::Cyan),
            Cell::new("Copies").fg(Color::Cyan),
        ]);

    for book in books {
        let copies_color = if book.copies == 0 { Color::Red } else { Color::Green };
        table.add_row(vec![
            Cell::new(&book.title),
            Cell::new(&book.author),
            Cell::new(&book.genre),
            Cell::new(book.copies).fg(copies_color),
        ]);
    }

    println!("{table}");
}

/// Print catalog statistics
pub fn print_library_stats(stats: &LibraryStats) {
    println!("{}", "Catalog Statistics".bold().underline());
    println!();
    println!("  {} {}", "Most popular author:".bold(), stats.popular_author);
    println!("  {} {}", "Most popular genre:".bold(), stats.popular_genre);
    println!(
        "  {} {} ({})",
        "Most copies:".bold(),
        stats.max_copies.title,
        stats.max_copies.copies
    );
    println!(
        "  {} {} ({})",
        "Fewest copies:".bold(),
        stats.min_copies.title,
        stats.min_copies.copies
    );
}

/// Print decoded token claims
pub fn print_claims(claims: &Claims, expired: bool) {
    println!("{}", "Token Claims".bold().underline());
    println!();
    println!("  {} {}", "Subject:".bold(), claims.sub);
    println!("  {} {}", "Role:".bold(), claims.role);
    if let Some(name) = &claims.name {
        println!("  {} {}", "Name:".bold(), name);
    }
    if let Some(group) = &claims.group {
        println!("  {} {}", "Group:".bold(), group);
    }
    for (key, value) in claims.extra() {
        println!("  {} {}", format!("{}:", key).bold(), value);
    }

    let status = if expired {
        "expired".red()
    } else {
        "valid".green()
    };
    println!("  {} {} ({})", "Expires:".bold(), claims.exp, status);
}
