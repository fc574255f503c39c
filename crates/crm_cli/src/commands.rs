use crate::cli::*;
use anyhow::{anyhow, bail, Context};
use crm_core::model::catalog::{find_service, STUDIO_SERVICES};
use crm_core::{
    init_from_config, open_db, open_db_in_memory, Client, ClientDraft, CoreConfig, CrmService,
    Order, OrderDraft, OrderNumbering, OrderStatus, SqliteBlobStore, StatusFilter,
};
use log::info;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    init_from_config(&config).map_err(|err| anyhow!("failed to start logging: {err}"))?;

    let conn = match &config.db_path {
        Some(path) => open_db(path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?,
        None => open_db_in_memory().context("failed to open in-memory database")?,
    };
    let mut crm = CrmService::load(SqliteBlobStore::new(&conn), &config.keys);
    info!(
        "event=cli_command module=cli status=start command={:?}",
        cli.command
    );

    match cli.command {
        Command::Orders { action } => cmd_orders(&mut crm, action),
        Command::Clients { action } => cmd_clients(&mut crm, action),
        Command::Export(args) => cmd_export(&crm, args),
        Command::Import(args) => cmd_import(&mut crm, args),
        Command::Stats => {
            let stats = dashboard_stats(crm.orders().all(), crm.clients().len());
            print!("{stats}");
            Ok(())
        }
        Command::Services => {
            for service in STUDIO_SERVICES {
                println!("{:<24} {:>8}", service.name, service.default_price);
            }
            Ok(())
        }
    }
}

/// Environment first, then command-line flags on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let mut config = CoreConfig::from_env()?;
    if let Some(path) = &cli.db {
        config = config.with_db_path(path);
    }
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level)?;
    }
    if let Some(dir) = &cli.log_dir {
        config = config.with_log_dir(dir)?;
    }
    Ok(config)
}

type Crm<'conn> = CrmService<SqliteBlobStore<'conn>>;

fn cmd_orders(crm: &mut Crm<'_>, action: OrderAction) -> anyhow::Result<()> {
    match action {
        OrderAction::List(args) => {
            let status = StatusFilter::parse(&args.status)
                .ok_or_else(|| anyhow!("unknown status filter `{}`", args.status))?;
            let orders = crm.orders_mut();
            orders.set_search_term(args.search);
            orders.set_status_filter(status);
            for order in orders.filtered() {
                println!("{}", order_line(order));
            }
            Ok(())
        }
        OrderAction::Add(args) => {
            let numbering = if args.random_number {
                OrderNumbering::Random
            } else {
                OrderNumbering::Sequential
            };
            let mut draft = crm.new_order_draft(numbering);
            if !crm.assign_customer(&mut draft, &args.client) {
                bail!("client `{}` not found", args.client);
            }
            draft.status = parse_status(&args.status)?;
            draft.comments = args.comments;
            let specs = args
                .items
                .iter()
                .map(|spec| parse_item_spec(spec))
                .collect::<anyhow::Result<Vec<_>>>()?;
            fill_items(&mut draft, &specs)?;

            let order = crm.create_order(draft)?;
            println!("created {}", order_line(&order));
            Ok(())
        }
        OrderAction::Move { id, status } => {
            let status = parse_status(&status)?;
            if !crm.move_order(&id, status) {
                bail!("order `{id}` not found");
            }
            println!("moved {id} to {status}");
            Ok(())
        }
        OrderAction::Delete { id } => {
            let order = crm
                .delete_order(&id)
                .ok_or_else(|| anyhow!("order `{id}` not found"))?;
            println!("deleted {}", order.number);
            Ok(())
        }
        OrderAction::NextNumber => {
            println!("{}", crm.next_order_number());
            Ok(())
        }
    }
}

fn cmd_clients(crm: &mut Crm<'_>, action: ClientAction) -> anyhow::Result<()> {
    match action {
        ClientAction::List { search } => {
            let clients = crm.clients_mut();
            clients.set_search_term(search);
            for client in clients.filtered() {
                println!("{}", client_line(client));
            }
            Ok(())
        }
        ClientAction::Add(args) => {
            let draft = ClientDraft {
                company: args.company,
                position: args.position,
                website: args.website,
                source: args.source,
                ..ClientDraft::new(args.name, args.email, args.phone)
            };
            let client = crm.create_client(draft)?;
            println!("created {}", client_line(&client));
            Ok(())
        }
        ClientAction::Delete { id } => {
            let client = crm
                .delete_client(&id)
                .ok_or_else(|| anyhow!("client `{id}` not found"))?;
            println!("deleted {}", client.name);
            Ok(())
        }
    }
}

fn cmd_export(crm: &Crm<'_>, args: ExportArgs) -> anyhow::Result<()> {
    let text = match args.collection {
        Collection::Orders => crm.export_orders()?,
        Collection::Clients => crm.export_clients()?,
    };
    match args.output {
        Some(path) => std::fs::write(&path, text)
            .with_context(|| format!("failed to write `{}`", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}

fn cmd_import(crm: &mut Crm<'_>, args: ImportArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read `{}`", args.file.display()))?;
    let count = match args.collection {
        Collection::Orders => crm.import_orders(&text)?,
        Collection::Clients => crm.import_clients(&text)?,
    };
    println!("imported {count} record(s)");
    Ok(())
}

fn parse_status(value: &str) -> anyhow::Result<OrderStatus> {
    OrderStatus::parse(value.trim()).ok_or_else(|| {
        anyhow!("unknown status `{value}`; expected new|processing|completed|cancelled")
    })
}

/// One `--item` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ItemSpec {
    pub name: String,
    pub quantity: u32,
    pub price: Option<u64>,
}

/// Parses `NAME[*QTY][=PRICE]`.
pub(crate) fn parse_item_spec(spec: &str) -> anyhow::Result<ItemSpec> {
    let (rest, price) = match spec.rsplit_once('=') {
        Some((rest, price)) => {
            let price = price
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid price in item `{spec}`"))?;
            (rest, Some(price))
        }
        None => (spec, None),
    };
    let (name, quantity) = match rest.rsplit_once('*') {
        Some((name, quantity)) => {
            let quantity = quantity
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid quantity in item `{spec}`"))?;
            (name, quantity)
        }
        None => (rest, 1),
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("item `{spec}` has no name");
    }
    Ok(ItemSpec {
        name: name.to_string(),
        quantity,
        price,
    })
}

/// Writes the specs into the draft's item list, reusing its blank first line.
fn fill_items(draft: &mut OrderDraft, specs: &[ItemSpec]) -> anyhow::Result<()> {
    for (index, spec) in specs.iter().enumerate() {
        let item_id = match index {
            0 => draft.items.as_slice()[0].id.clone(),
            _ => draft.items.push_blank(),
        };
        if !draft.items.apply_service(&item_id, &spec.name) {
            draft.items.set_name(&item_id, spec.name.as_str());
        }
        draft.items.set_quantity(&item_id, spec.quantity);
        match spec.price {
            Some(price) => {
                draft.items.set_price(&item_id, price);
            }
            None if find_service(&spec.name).is_none() => {
                bail!("`{}` is not a catalog service; give a price with `=PRICE`", spec.name)
            }
            None => {}
        }
    }
    Ok(())
}

fn order_line(order: &Order) -> String {
    format!(
        "{:<8} {} {:<10} {:<20} {:>9}  {}",
        order.number,
        order.date,
        order.status,
        order.customer.name,
        order.total(),
        order.id
    )
}

fn client_line(client: &Client) -> String {
    format!(
        "{:<20} {:<24} {:<18} orders={:<3} {}",
        client.name, client.email, client.phone, client.orders, client.id
    )
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DashboardStats {
    pub total_orders: usize,
    pub per_status: Vec<(OrderStatus, usize)>,
    pub completed_revenue: u64,
    pub clients: usize,
}

pub(crate) fn dashboard_stats(orders: &[Order], clients: usize) -> DashboardStats {
    let per_status = OrderStatus::ALL
        .iter()
        .map(|status| {
            let count = orders.iter().filter(|order| order.status == *status).count();
            (*status, count)
        })
        .collect();
    let completed_revenue = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .map(Order::total)
        .sum();
    DashboardStats {
        total_orders: orders.len(),
        per_status,
        completed_revenue,
        clients,
    }
}

impl std::fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "orders: {}", self.total_orders)?;
        for (status, count) in &self.per_status {
            writeln!(f, "  {status:<11} {count}")?;
        }
        writeln!(f, "completed revenue: {}", self.completed_revenue)?;
        writeln!(f, "clients: {}", self.clients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crm_core::model::seed::seed_orders;
    use crm_core::{BlobStore, StorageKeys};

    #[test]
    fn item_spec_accepts_quantity_and_price() {
        assert_eq!(
            parse_item_spec("Logo design").unwrap(),
            ItemSpec {
                name: "Logo design".to_string(),
                quantity: 1,
                price: None,
            }
        );
        assert_eq!(
            parse_item_spec("Hosting * 3 = 1500").unwrap(),
            ItemSpec {
                name: "Hosting".to_string(),
                quantity: 3,
                price: Some(1500),
            }
        );
        assert!(parse_item_spec("*2").is_err());
        assert!(parse_item_spec("Hosting=cheap").is_err());
    }

    #[test]
    fn fill_items_uses_catalog_prices_and_requires_custom_prices() {
        let mut draft = OrderDraft::new("ORD-100");
        let specs = [
            parse_item_spec("SEO optimization*2").unwrap(),
            parse_item_spec("Hosting=1500").unwrap(),
        ];
        fill_items(&mut draft, &specs).unwrap();
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.total(), 2 * 30_000 + 1500);

        let mut draft = OrderDraft::new("ORD-101");
        let err = fill_items(&mut draft, &[parse_item_spec("Hosting").unwrap()]).unwrap_err();
        assert!(err.to_string().contains("not a catalog service"));
    }

    #[test]
    fn stats_count_statuses_and_completed_revenue() {
        let orders = seed_orders();
        let stats = dashboard_stats(&orders, 5);
        assert_eq!(stats.total_orders, orders.len());
        let counted: usize = stats.per_status.iter().map(|(_, count)| count).sum();
        assert_eq!(counted, orders.len());

        let expected: u64 = orders
            .iter()
            .filter(|order| order.status == OrderStatus::Completed)
            .map(Order::total)
            .sum();
        assert_eq!(stats.completed_revenue, expected);
        assert!(stats.to_string().contains("completed revenue"));
    }

    #[test]
    fn commands_persist_to_the_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("crm.sqlite3");
        let db_arg = db.to_str().unwrap();
        let run = |args: &[&str]| {
            let mut argv = vec!["crm", "--db", db_arg];
            argv.extend_from_slice(args);
            run_command(Cli::try_parse_from(argv).unwrap())
        };

        run(&["orders", "add", "--client", "seed-client-ivan", "--item", "CRM setup"]).unwrap();
        run(&["orders", "move", "seed-order-002", "completed"]).unwrap();
        assert!(run(&["orders", "delete", "missing"]).is_err());

        let conn = open_db(&db).unwrap();
        let crm = CrmService::load(SqliteBlobStore::new(&conn), &StorageKeys::default());
        assert_eq!(crm.orders().len(), seed_orders().len() + 1);
        assert_eq!(crm.next_order_number(), "ORD-007");
        let ivan = crm.clients().get_by_id("seed-client-ivan").unwrap();
        assert_eq!(ivan.orders, 2);
        assert!(SqliteBlobStore::new(&conn)
            .get(&StorageKeys::default().orders)
            .unwrap()
            .is_some());
    }
}
