use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use flooring_mastery::{build_service, setup_environment};
use rust_decimal::Decimal;
use shared::money::format_money;
use shared::{NewOrder, Order, OrderEdit};

/// Flooring order management
#[derive(Parser)]
#[command(name = "flooring-mastery")]
#[command(about = "Create, list, edit, remove and export flooring orders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List orders placed on a date
    List {
        /// Order date (yyyy-mm-dd)
        date: NaiveDate,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one order
    Show { date: NaiveDate, number: u32 },
    /// Place a new order
    Add {
        date: NaiveDate,
        customer: String,
        /// State abbreviation, e.g. TX
        state: String,
        product: String,
        /// Area in square feet (at least 100)
        area: Decimal,
    },
    /// Edit an existing order; omitted fields keep their value
    Edit {
        date: NaiveDate,
        number: u32,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        product: Option<String>,

        #[arg(long)]
        area: Option<Decimal>,
    },
    /// Remove an order
    Remove { date: NaiveDate, number: u32 },
    /// Write every order to the export file
    Export,
    /// List available products
    Products,
    /// List states with a tax rate
    States,
}

impl Commands {
    /// Commands that rewrite order files
    fn modifies_orders(&self) -> bool {
        matches!(self, Self::Add { .. } | Self::Edit { .. } | Self::Remove { .. })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. 设置环境 (dotenv, 配置, 日志)
    let config = setup_environment()?;

    // 2. 载入税率、产品和订单
    let mut service = build_service(&config)?;
    if let Err(e) = service.load_all() {
        // partial loads stay readable; numbering and saving need every file
        if cli.command.modifies_orders() {
            return Err(anyhow::Error::new(e)
                .context("orders did not load completely, not modifying them"));
        }
        eprintln!("Warning: {e}");
    }

    // 3. 执行命令
    match cli.command {
        Commands::List { date, json } => {
            let orders = service.orders_on(date);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&orders).context("serializing orders")?
                );
            } else if orders.is_empty() {
                println!("No orders on {date}");
            } else {
                orders.iter().for_each(print_order);
            }
        }
        Commands::Show { date, number } => match service.lookup(date, number) {
            Some(order) => print_order(&order),
            None => bail!("No order #{number} on {date}"),
        },
        Commands::Add {
            date,
            customer,
            state,
            product,
            area,
        } => {
            let order = service.draft_order(NewOrder {
                order_date: date,
                customer_name: customer,
                state,
                product_type: product,
                area,
            })?;
            service.submit_new_order(order.clone())?;
            service.save_all()?;
            print_order(&order);
        }
        Commands::Edit {
            date,
            number,
            name,
            state,
            product,
            area,
        } => {
            let edit = OrderEdit {
                customer_name: name,
                state,
                product_type: product,
                area,
            };
            if edit.is_empty() {
                bail!("Nothing to change: pass at least one of --name, --state, --product, --area");
            }
            let order = service.draft_edit(date, number, edit)?;
            service.submit_replacement(order.clone())?;
            service.save_all()?;
            print_order(&order);
        }
        Commands::Remove { date, number } => {
            let order = service.remove(date, number)?;
            service.save_all()?;
            println!("Removed order #{} for {}", order.order_number(), order.customer_name());
        }
        Commands::Export => {
            service.export_all()?;
            println!(
                "Exported {} orders to {}",
                service.storage().len(),
                config.export_file.display()
            );
        }
        Commands::Products => {
            for product in service.products() {
                println!(
                    "{:<12} {:>8}/sqft material {:>8}/sqft labor",
                    product.product_type(),
                    product.cost_per_square_foot(),
                    product.labor_cost_per_square_foot()
                );
            }
        }
        Commands::States => {
            for abbr in service.states() {
                let name = service.state_name(&abbr).unwrap_or_default();
                println!("{abbr:<4} {name}");
            }
        }
    }

    Ok(())
}

fn print_order(order: &Order) {
    println!(
        "#{} {} | {} ({}%) | {} x {} sqft",
        order.order_number(),
        order.customer_name(),
        order.state(),
        order.tax_rate(),
        order.product().product_type(),
        order.area()
    );
    println!(
        "    material {}  labor {}  tax {}  total {}",
        format_money(order.material_cost()),
        format_money(order.labor_cost()),
        format_money(order.tax()),
        format_money(order.total())
    );
}
