use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 17] = [
        "RUST_LOG",
        "AMB_HOST",
        "AMB_PORT",
        "AMB_DATABASE_URL",
        "AMB_DB_MAX_CONNECTIONS",
        "AMB_DB_BUSY_TIMEOUT_SECS",
        "AMB_REDIS_URL",
        "AMB_CACHE_CLEAR_DELAY_MS",
        "AMB_CHECKOUT_SUCCESS_URL",
        "AMB_CHECKOUT_CANCEL_URL",
        "AMB_CHECKOUT_CURRENCY",
        "AMB_STRIPE_API_BASE",
        "AMB_STRIPE_TIMEOUT_SECS",
        "AMB_SMTP_HOST",
        "AMB_SMTP_PORT",
        "AMB_MAIL_FROM",
        "AMB_ADMIN_EMAIL",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
