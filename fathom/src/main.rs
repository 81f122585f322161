use fathom::{command_argument_builder, handle_crawl};
use fathom_core::print_banner;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();

    if !matches.get_flag("quiet") {
        print_banner();
    }

    let code = handle_crawl(&matches).await;
    std::process::exit(code);
}
