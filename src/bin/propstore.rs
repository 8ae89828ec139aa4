// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line tool printing the properties a registry loads.
//!
//! ```bash
//! propstore --uri file:conf/properties.yaml
//! propstore --uri file:conf/properties.yaml --owner '{http://www.orbeon.com/oxf/processors}page-flow'
//! propstore --uri file:conf/properties.yaml --watch
//! ```

use clap::Parser;
use propstore::prelude::*;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

#[derive(Parser, Debug)]
#[command(name = "propstore", version, about = "Print typed properties from a property document")]
struct Args {
    /// Resource to read, as a path or `file:` URI (defaults to PROPSTORE_URI, then file:properties.yaml)
    #[arg(long)]
    uri: Option<String>,

    /// Print the properties of this owner, in Clark notation `{namespace}local`
    #[arg(long)]
    owner: Option<String>,

    /// Print property names only
    #[arg(long)]
    keys: bool,

    /// Keep running and print the properties again whenever the document changes
    #[arg(long)]
    watch: bool,
}

fn print_set(set: &PropertySet, keys_only: bool) {
    let mut entries: Vec<_> = set.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in entries {
        if keys_only {
            println!("{}", name);
        } else {
            println!("{} ({}) = {}", name, value.declared_type(), value.raw());
        }
    }
}

fn print_store(store: &PropertyStore, owner: Option<&QualifiedName>, keys_only: bool) {
    match owner {
        Some(owner) => match store.property_set(owner) {
            Some(set) => print_set(set, keys_only),
            None => eprintln!("No properties declared for owner {}", owner),
        },
        None => {
            print_set(store.global_property_set(), keys_only);
            let mut owners: Vec<_> = store.owners().collect();
            owners.sort();
            for owner in owners {
                if let Some(set) = store.property_set(owner) {
                    println!("\n[{}]", owner);
                    print_set(set, keys_only);
                }
            }
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut builder = PropertyRegistry::builder().with_env_overrides()?;
    if let Some(uri) = &args.uri {
        builder = builder.with_uri(uri.clone());
    }
    let registry = builder.build()?;
    let owner = args.owner.as_deref().map(str::parse::<QualifiedName>).transpose()?;

    registry.init(registry.uri())?;
    let mut current = registry
        .store()
        .ok_or_else(|| PropertyError::ConfigurationUnavailable {
            message: "No property store has been loaded".to_string(),
        })?;
    print_store(&current, owner.as_ref(), args.keys);

    if args.watch {
        loop {
            thread::sleep(registry.refresh_interval());
            if let Some(latest) = registry.store() {
                if !Arc::ptr_eq(&latest, &current) {
                    println!("\n--- reloaded ---");
                    print_store(&latest, owner.as_ref(), args.keys);
                    current = latest;
                }
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
