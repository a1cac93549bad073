//! Help and usage output

use colored::Colorize;

const LOGO: [&str; 6] = [
    "           ",
    "J O U K K O",
    "M O B P R O",
    "G R A M M I",
    "N G T O O L",
    "           ",
];

/// Commands with their one-line descriptions, in help order
const COMMANDS: [(&str, &str); 6] = [
    ("start", "Start the mob programming session."),
    ("pass", "Ends the current driver's turn i.e. 'passes the torch'."),
    ("take", "Sets up the new driver's turn i.e. 'takes the reins'."),
    ("finish", "Finishes the mob programming session."),
    ("rename", "Renames current branch and updates joukko file branch."),
    ("help", "Prints this help."),
];

pub fn print_help() {
    for row in LOGO {
        println!("{}", format!("  {}  ", row).white().on_black());
    }
    println!("joukko - A tool for mob programming sessions with git.");
    println!();
    println!("To use joukko, one of the following arguments must be given:");
    for (command, description) in COMMANDS {
        println!(" {} {}", format!("{:<8}", command).green(), description);
    }
    println!();
}

/// Error for a missing or unknown argument, followed by the accepted ones
pub fn print_usage_error(message: &str, accepted: &[String]) {
    println!("  {}", message.red());
    println!(" Acceptable arguments are:  {}", accepted.join(", ").green());
}
