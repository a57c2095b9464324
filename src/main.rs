use std::error::Error;

use compost_twin::logging::init_tracing;
use compost_twin::{
    activity_series, BinState, CompostModel, RunSummary, SimulationParams, WasteCatalog,
    WasteLookup,
};

const USAGE: &str = "usage: compost_twin [--catalog FILE] [--params FILE] [--waste NAME] \
[--mass KG] [--days N] [--json]";

#[derive(Debug)]
struct Args {
    catalog: Option<String>,
    params: Option<String>,
    waste: Option<String>,
    mass: f64,
    days: i64,
    json: bool,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> Result<Self, Box<dyn Error>> {
        let mut args = Args {
            catalog: None,
            params: None,
            waste: None,
            mass: 0.5,
            days: 30,
            json: false,
        };
        while let Some(flag) = raw.next() {
            let mut value = || raw.next().ok_or_else(|| format!("{flag} needs a value\n{USAGE}"));
            match flag.as_str() {
                "--catalog" => args.catalog = Some(value()?),
                "--params" => args.params = Some(value()?),
                "--waste" => args.waste = Some(value()?),
                "--mass" => args.mass = value()?.parse()?,
                "--days" => args.days = value()?.parse()?,
                "--json" => args.json = true,
                "-h" | "--help" => return Err(USAGE.into()),
                other => return Err(format!("unknown argument {other}\n{USAGE}").into()),
            }
        }
        Ok(args)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let args = Args::parse(std::env::args().skip(1))?;

    let params = match &args.params {
        Some(path) => SimulationParams::from_json_file(path)?,
        None => SimulationParams::default(),
    };
    let model = CompostModel::new(params)?;

    // Starting bin: 5 kg at ambient temperature, moisture and pH in range.
    let mut bin = BinState::new(5.0, 30.0, 55.0, 7.0, 1.0).with_activity(0.2);

    if let Some(path) = &args.catalog {
        let catalog = WasteCatalog::from_json_file(path)?;
        match &args.waste {
            Some(name) => model.add_waste_by_name(&mut bin, &catalog, name, args.mass)?,
            None => {
                println!("waste types:");
                for name in catalog.waste_type_names() {
                    println!("  {name}");
                }
                return Ok(());
            }
        }
    } else if args.waste.is_some() {
        return Err(format!("--waste requires --catalog\n{USAGE}").into());
    }

    let history = model.run(&bin, args.days)?;
    let summary = RunSummary::from_history(&bin, &history);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    println!("final mass (kg): {:.2}", summary.final_mass);
    println!("final microbial activity: {:.2}", summary.final_activity);
    println!("degradation efficiency (%): {:.1}", summary.mass_reduction_pct);
    println!("day,mass,temperature,moisture,pH,microbial_activity");
    for entry in &history {
        println!(
            "{},{:.4},{:.2},{:.2},{:.3},{:.3}",
            entry.day, entry.mass, entry.temperature, entry.moisture, entry.ph, entry.microbial_activity
        );
    }

    let peak = activity_series(&history)
        .into_iter()
        .fold(None::<(u32, f64)>, |best, point| match best {
            Some(b) if b.1 >= point.1 => Some(b),
            _ => Some(point),
        });
    if let Some((day, activity)) = peak {
        tracing::info!(day, activity, "peak microbial activity");
    }

    Ok(())
}
