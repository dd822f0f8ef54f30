use std::error::Error;

use phytomatch::{ProductQuery, build_matcher_from_file};

const USAGE: &str = "usage: phytomatch <config.yaml> <disease scientific name> [plant scientific name]";

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(disease)) = (args.next(), args.next()) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let mut query = ProductQuery::new(disease);
    if let Some(plant) = args.next() {
        query = query.with_plant(plant);
    }

    let matcher = build_matcher_from_file(&config_path)?;
    let matches = matcher.search(&query)?;

    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}
