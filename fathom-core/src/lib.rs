pub mod crawl;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
   __       _   _
  / _| __ _| |_| |__   ___  _ __ ___
 | |_ / _` | __| '_ \ / _ \| '_ ` _ \
 |  _| (_| | |_| | | | (_) | | | | | |
 |_|  \__,_|\__|_| |_|\___/|_| |_| |_|
"#;
    println!("{}", banner.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "depth-bounded web crawler".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}
