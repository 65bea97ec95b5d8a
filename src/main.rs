// SPDX-License-Identifier: GPL-3.0-only

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use std::{fs, path::PathBuf};

use system76_firmware_loadoption::efivarfs::Efivarfs;
use system76_firmware_loadoption::variable::parse_boot_option_name;
use system76_firmware_loadoption::{BootManager, BootOrder, LoadOption};

/// Inspect UEFI boot entries.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// efivarfs mount point.
    #[arg(long, global = true, default_value = Efivarfs::DEFAULT_ROOT)]
    efivars: PathBuf,

    /// Increase log verbosity, repeat for more.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// List boot entries in boot order.
    List,
    /// Print the boot order.
    Order,
    /// Show one boot entry in detail.
    Show {
        /// Boot option id, as `0001` or `Boot0001`.
        #[arg(value_parser = parse_id)]
        id: u16,
    },
    /// Decode a variable dumped to a file.
    Decode {
        file: PathBuf,
        /// Decode as BootOrder instead of a load option.
        #[arg(long)]
        boot_order: bool,
        /// Skip the 4 byte attribute prefix of files copied from efivarfs.
        #[arg(long)]
        strip_attributes: bool,
    },
}

fn parse_id(s: &str) -> std::result::Result<u16, String> {
    parse_boot_option_name(s)
        .or_else(|| parse_boot_option_name(&format!("Boot{}", s)))
        .ok_or_else(|| format!("invalid boot option id {:?}", s))
}

fn hexdump(data: &[u8]) {
    for row in 0..(data.len() + 15) / 16 {
        print!("{:04X}:", row * 16);
        for col in 0..16 {
            let j = row * 16 + col;
            if j < data.len() {
                print!(" {:02X}", data[j]);
            }
        }
        println!();
    }
}

fn print_order(order: &BootOrder) {
    let ids: Vec<String> = order.iter().map(|id| format!("{:04X}", id)).collect();
    println!("BootOrder: {}", ids.join(","));
}

fn print_option(option: &LoadOption) {
    println!("Attributes: {:#010x} ({:?})", option.attributes().bits(), option.category());
    println!("Description: {}", option.description());
    println!("File path list: {} bytes", option.file_path_list_length());
    for node in option.file_path_list() {
        println!("  {}", node.summary());
    }
    if !option.optional_data().is_empty() {
        println!("Optional data: {} bytes", option.optional_data().len());
        hexdump(option.optional_data());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let manager = BootManager::new(Efivarfs::new(&cli.efivars));

    match cli.command {
        Command::List => {
            let order = manager.boot_order().context("failed to read boot order")?;
            print_order(&order);
            for entry in manager.entries_in(&order) {
                match entry {
                    Ok(entry) => {
                        let option = entry.load_option()?;
                        let active = if option.is_active() { "*" } else { " " };
                        println!("\x1B[1m{}{}\x1B[0m {}", entry.name(), active, option);
                    }
                    Err(err) => println!("\x1B[1m\x1B[91m{}\x1B[39m\x1B[0m", err),
                }
            }
        }
        Command::Order => {
            let order = manager.boot_order().context("failed to read boot order")?;
            print_order(&order);
        }
        Command::Show { id } => {
            let entry = manager.boot_entry(id)?;
            println!("\x1B[1m{}\x1B[0m", entry.name());
            print_option(&entry.load_option()?);
        }
        Command::Decode {
            file,
            boot_order,
            strip_attributes,
        } => {
            let data = fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let data = if strip_attributes {
                data.get(4..).context("file is shorter than the attribute prefix")?
            } else {
                &data[..]
            };

            if boot_order {
                print_order(&BootOrder::from_raw(data)?);
            } else {
                print_option(&LoadOption::from_raw(data)?);
            }
        }
    }

    Ok(())
}
