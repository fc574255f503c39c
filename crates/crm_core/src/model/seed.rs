//! Built-in dataset used when storage holds nothing usable.
//!
//! Seed orders reference seed clients by id, and each client's `orders`
//! counter matches the number of seed orders pointing at it.

use crate::model::client::Client;
use crate::model::order::{CustomerSnapshot, Order, OrderItem, OrderItems, OrderStatus};
use chrono::NaiveDate;

struct SeedClient {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    company: &'static str,
    position: &'static str,
    website: &'static str,
    source: &'static str,
}

const SEED_CLIENTS: &[SeedClient] = &[
    SeedClient {
        id: "seed-client-ivan",
        name: "Ivan Petrov",
        email: "ivan@example.com",
        phone: "+7 (999) 123-4567",
        company: "Innovations LLC",
        position: "Director",
        website: "innovate.ru",
        source: "Referral",
    },
    SeedClient {
        id: "seed-client-elena",
        name: "Elena Smirnova",
        email: "elena@example.com",
        phone: "+7 (999) 765-4321",
        company: "Smirnova Shop",
        position: "Owner",
        website: "elen-shop.ru",
        source: "Instagram",
    },
    SeedClient {
        id: "seed-client-alexey",
        name: "Alexey Kozlov",
        email: "alexey@example.com",
        phone: "+7 (999) 555-7777",
        company: "Web Solutions",
        position: "Project manager",
        website: "websolutions.ru",
        source: "Search ads",
    },
    SeedClient {
        id: "seed-client-maria",
        name: "Maria Ivanova",
        email: "maria@example.com",
        phone: "+7 (999) 888-9999",
        company: "Startup Idea",
        position: "CEO",
        website: "startidea.io",
        source: "Conference",
    },
    SeedClient {
        id: "seed-client-sergey",
        name: "Sergey Nikitin",
        email: "sergey@example.com",
        phone: "+7 (999) 444-3333",
        company: "Digital Solutions",
        position: "Marketer",
        website: "digsolutions.ru",
        source: "Company website",
    },
];

/// The five seed clients.
pub fn seed_clients() -> Vec<Client> {
    let orders = seed_orders();
    SEED_CLIENTS
        .iter()
        .map(|seed| Client {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            email: seed.email.to_string(),
            phone: seed.phone.to_string(),
            orders: orders
                .iter()
                .filter(|order| order.customer.id == seed.id)
                .count() as u32,
            company: Some(seed.company.to_string()),
            position: Some(seed.position.to_string()),
            website: Some(seed.website.to_string()),
            source: Some(seed.source.to_string()),
        })
        .collect()
}

/// The seed orders, one per board column at least.
pub fn seed_orders() -> Vec<Order> {
    vec![
        seed_order(
            "seed-order-001",
            "ORD-001",
            (2023, 9, 15),
            OrderStatus::Completed,
            0,
            vec![
                ("Website development", 1, 100_000),
                ("Technical support", 2, 20_000),
            ],
            None,
        ),
        seed_order(
            "seed-order-002",
            "ORD-002",
            (2023, 9, 18),
            OrderStatus::Processing,
            1,
            vec![("UI/UX design", 1, 50_000)],
            None,
        ),
        seed_order(
            "seed-order-003",
            "ORD-003",
            (2023, 9, 20),
            OrderStatus::New,
            2,
            vec![("SEO optimization", 2, 30_000), ("Logo design", 1, 25_000)],
            None,
        ),
        seed_order(
            "seed-order-004",
            "ORD-004",
            (2023, 9, 25),
            OrderStatus::Cancelled,
            3,
            vec![("Mobile app development", 1, 200_000)],
            Some("Client cancelled: timeline did not fit their launch"),
        ),
        seed_order(
            "seed-order-005",
            "ORD-005",
            (2023, 9, 27),
            OrderStatus::New,
            4,
            vec![("SMM promotion", 1, 35_000)],
            None,
        ),
    ]
}

fn seed_order(
    id: &str,
    number: &str,
    (year, month, day): (i32, u32, u32),
    status: OrderStatus,
    client_index: usize,
    lines: Vec<(&str, u32, u64)>,
    comments: Option<&str>,
) -> Order {
    let client = &SEED_CLIENTS[client_index];
    let mut lines = lines
        .into_iter()
        .enumerate()
        .map(|(index, (name, quantity, price))| OrderItem {
            id: format!("{id}-item-{}", index + 1),
            name: name.to_string(),
            quantity,
            price,
        });
    let mut items = OrderItems::new(lines.next().unwrap_or_else(OrderItem::blank));
    for line in lines {
        items.push(line);
    }

    Order {
        id: id.to_string(),
        number: number.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        status,
        customer: CustomerSnapshot {
            id: client.id.to_string(),
            name: client.name.to_string(),
            email: client.email.to_string(),
            phone: client.phone.to_string(),
        },
        items,
        comments: comments.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::{seed_clients, seed_orders};

    #[test]
    fn seed_counters_match_seed_orders() {
        let orders = seed_orders();
        let total: u32 = seed_clients().iter().map(|client| client.orders).sum();
        assert_eq!(total as usize, orders.len());
    }

    #[test]
    fn seed_orders_have_unique_ids() {
        let orders = seed_orders();
        let mut ids: Vec<_> = orders.iter().map(|order| order.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), orders.len());
    }
}
