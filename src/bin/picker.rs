use std::env;
use std::process::ExitCode;

use placepicker::config::Config;
use placepicker::controller::Controller;
use placepicker::entities::Selection;
use placepicker::external::HttpGateway;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "usage: picker <list | picked | add <id> | remove <id>>";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let controller = Controller::new(HttpGateway::new(&config.api_base), config.remove_absent);

    if controller.hydrate().await.is_err() {
        if let Some(notice) = controller.load_error().await {
            eprintln!("An error occurred! {}", notice.message);
        }
        return ExitCode::FAILURE;
    }

    match args.as_slice() {
        ["list"] => match controller.available_places().await {
            Ok(places) => {
                for place in places {
                    println!("{}\t{}\t({}, {})", place.id, place.title, place.lat, place.lon);
                }
            }
            Err(err) => {
                eprintln!("{}", err.message);
                return ExitCode::FAILURE;
            }
        },
        ["picked"] => print_selection(&controller.selection().await),
        ["add", id] => {
            let places = match controller.available_places().await {
                Ok(places) => places,
                Err(err) => {
                    eprintln!("{}", err.message);
                    return ExitCode::FAILURE;
                }
            };

            let Some(place) = places.into_iter().find(|place| place.id == *id) else {
                eprintln!("no place with id {}", id);
                return ExitCode::FAILURE;
            };

            let _ = controller.add(place).await;
            print_selection(&controller.selection().await);
        }
        ["remove", id] => {
            let _ = controller.remove(id).await;
            print_selection(&controller.selection().await);
        }
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    }

    controller.flush().await;

    if let Some(notice) = controller.notice().await {
        eprintln!("An error occurred! {}", notice.message);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn print_selection(selection: &Selection) {
    if selection.is_empty() {
        println!("Select the places you would like to visit below.");
        return;
    }

    for place in selection.places() {
        println!("{}\t{}", place.id, place.title);
    }
}
