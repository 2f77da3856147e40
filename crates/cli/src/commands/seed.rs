//! Database seeding command.
//!
//! Creates a realistic development dataset in dependency order: users and
//! accounts, stores with opening hours, sections and products, addresses
//! (exactly one default per owner), then orders placed through the real
//! order service so pricing and minimum-order rules hold for the seeded
//! data too.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use prato_api::db::{self, RepositoryError};
use prato_api::models::{Account, Product, Store};
use prato_api::services::accounts::{AccountError, NewAccount};
use prato_api::services::addresses::{AddressError, SaveAddress};
use prato_api::services::orders::{CreateOrder, DeliveryAddressInput, OrderError};
use prato_api::services::{AccountService, AddressService, OrderService};
use prato_core::cart::CartLine;
use prato_core::{AccountKind, AddressOwner, SectionForm};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),
}

/// Seeding volume and reproducibility knobs.
#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub stores: u32,
    pub clients: u32,
    pub orders: u32,
    pub rng_seed: u64,
}

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elisa", "Felipe", "Gabriela", "Heitor", "Isabela", "João",
    "Larissa", "Marcos", "Natália", "Otávio", "Paula", "Rafael",
];

const LAST_NAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Lima", "Pereira", "Costa", "Almeida", "Nascimento",
    "Carvalho",
];

const STORE_NAMES: &[&str] = &[
    "Cantina da Nonna",
    "Sabor do Sertão",
    "Tempero Mineiro",
    "Panela de Barro",
    "Cozinha da Vila",
    "Fogão a Lenha",
];

const SECTION_TITLES: &[&str] = &[
    "Pratos do Dia",
    "Marmitas",
    "Bebidas",
    "Sobremesas",
    "Adicionais",
];

const PRODUCT_NAMES: &[&str] = &[
    "Marmita Executiva",
    "Feijoada Completa",
    "Strogonoff de Frango",
    "Escondidinho de Carne",
    "Moqueca de Peixe",
    "Arroz Carreteiro",
    "Suco de Laranja",
    "Refrigerante Lata",
    "Pudim de Leite",
    "Brigadeiro",
    "Farofa Extra",
    "Vinagrete",
];

const CITIES: &[(&str, &str)] = &[
    ("São Paulo", "SP"),
    ("Rio de Janeiro", "RJ"),
    ("Belo Horizonte", "MG"),
    ("Curitiba", "PR"),
    ("Porto Alegre", "RS"),
];

const STREETS: &[&str] = &[
    "Avenida Paulista",
    "Rua das Flores",
    "Rua XV de Novembro",
    "Avenida Atlântica",
    "Rua da Bahia",
];

/// Run the seeder.
///
/// # Errors
///
/// Returns `SeedError` if any write fails. Orders that fall below a
/// store's minimum are skipped, not fatal.
pub async fn run(config: SeedConfig) -> Result<(), SeedError> {
    let database_url = std::env::var("PRATO_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("PRATO_DATABASE_URL"))?;

    let pool = prato_api::db::create_pool(&database_url).await?;
    let mut rng = StdRng::seed_from_u64(config.rng_seed);

    tracing::info!(
        stores = config.stores,
        clients = config.clients,
        orders = config.orders,
        "Seeding database"
    );

    let mut stores = Vec::new();
    for index in 0..config.stores {
        stores.push(create_store(&pool, &mut rng, index).await?);
    }

    let mut clients = Vec::new();
    for index in 0..config.clients {
        clients.push(create_client(&pool, &mut rng, index).await?);
    }

    // One default address per client, plus occasional extras.
    for account in &clients {
        create_address(&pool, &mut rng, AddressOwner::Account(account.id), true, "Casa").await?;
        if rng.random_range(0..3) == 0 {
            create_address(
                &pool,
                &mut rng,
                AddressOwner::Account(account.id),
                false,
                "Trabalho",
            )
            .await?;
        }
    }

    // Every store gets its default ("Matriz") address.
    for store in &stores {
        create_address(&pool, &mut rng, AddressOwner::Store(store.id), true, "Matriz").await?;
    }

    let mut placed = 0;
    for _ in 0..config.orders {
        if stores.is_empty() || clients.is_empty() {
            break;
        }
        let store = pick(&mut rng, &stores);
        let account = pick(&mut rng, &clients);
        match place_order(&pool, &mut rng, store, account).await {
            Ok(()) => placed += 1,
            Err(SeedError::Order(OrderError::BelowMinimum { subtotal, minimum })) => {
                tracing::debug!(%subtotal, %minimum, "Skipped order below store minimum");
            }
            Err(other) => return Err(other),
        }
    }

    tracing::info!(placed, "Seeding complete");
    Ok(())
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    let index = rng.random_range(0..items.len());
    items.get(index).expect("index in range")
}

fn digits(rng: &mut StdRng, count: usize) -> String {
    (0..count).map(|_| rng.random_range(0..=9).to_string()).collect()
}

fn money(rng: &mut StdRng, min_cents: i64, max_cents: i64) -> Decimal {
    Decimal::new(rng.random_range(min_cents..=max_cents), 2)
}

async fn create_client(
    pool: &PgPool,
    rng: &mut StdRng,
    index: u32,
) -> Result<Account, SeedError> {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let service = AccountService::new(pool);
    let (account, _) = service
        .create(NewAccount {
            first_name: (*first).to_owned(),
            last_name: (*last).to_owned(),
            email: format!(
                "{}.{}{index}@example.com",
                first.to_lowercase(),
                last.to_lowercase()
            ),
            kind: AccountKind::Client,
            cpf: digits(rng, 11),
            phone: format!("55{}", digits(rng, 11)),
        })
        .await?;

    Ok(account)
}

async fn create_store(pool: &PgPool, rng: &mut StdRng, index: u32) -> Result<Store, SeedError> {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let service = AccountService::new(pool);
    let (owner, _) = service
        .create(NewAccount {
            first_name: (*first).to_owned(),
            last_name: (*last).to_owned(),
            email: format!("dono.{index}@example.com"),
            kind: AccountKind::Admin,
            cpf: digits(rng, 11),
            phone: format!("55{}", digits(rng, 11)),
        })
        .await?;

    let name = format!("{} {}", pick(rng, STORE_NAMES), index + 1);
    let slug = name.to_lowercase().replace(' ', "-");

    let mut conn = pool.acquire().await?;
    let store = db::stores::insert(
        &mut *conn,
        &db::stores::CreateStore {
            owner_account_id: owner.id,
            name: name.clone(),
            fantasy_name: Some(format!("{name} Fantasia")),
            slug,
            cnpj: prato_core::Cnpj::parse(&digits(rng, 14))
                .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?,
            thumbnail: None,
            banner: None,
            min_order_value: money(rng, 1_000, 3_000),
            delivery_fee: money(rng, 0, 1_500),
            delivery_time: rng.random_range(20..=120),
        },
    )
    .await?;

    for weekday in 1..=5_i16 {
        db::stores::insert_opening_hours(
            &mut *conn,
            store.id,
            weekday,
            chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
        )
        .await?;
    }

    seed_catalog(&mut conn, rng, &store).await?;

    Ok(store)
}

async fn seed_catalog(
    conn: &mut sqlx::PgConnection,
    rng: &mut StdRng,
    store: &Store,
) -> Result<(), SeedError> {
    let mut sections = Vec::new();
    for (position, title) in SECTION_TITLES.iter().take(3).enumerate() {
        let section = db::products::insert_section(
            conn,
            &db::products::CreateSection {
                store_id: store.id,
                title: (*title).to_owned(),
                position: i32::try_from(position).unwrap_or(0),
                min_products: 0,
                max_products: 0,
                is_active: true,
                is_required: false,
                is_highlighted: position == 0,
                form: SectionForm::NotApplicable,
                textbox_help_text: None,
            },
        )
        .await?;
        sections.push(section);
    }

    let mut products = Vec::new();
    for (position, name) in PRODUCT_NAMES.iter().enumerate() {
        let section = pick(rng, &sections);
        let discount = if rng.random_range(0..4) == 0 {
            Decimal::new(10, 0)
        } else {
            Decimal::ZERO
        };
        let product = db::products::insert_product(
            conn,
            &db::products::CreateProduct {
                store_id: store.id,
                section_id: section.id,
                name: (*name).to_owned(),
                description: None,
                price: money(rng, 500, 6_000),
                discount_percentage: discount,
                position: i32::try_from(position).unwrap_or(0),
                is_active: true,
                picture: None,
                thumbnail: None,
            },
        )
        .await?;
        products.push(product);
    }

    // Cross-link a few products into extra sections.
    for product in products.iter().take(4) {
        let section = pick(rng, &sections);
        if section.id != product.section_id {
            db::products::link_product_section(conn, product.id, section.id, 0).await?;
        }
    }

    Ok(())
}

async fn create_address(
    pool: &PgPool,
    rng: &mut StdRng,
    owner: AddressOwner,
    is_default: bool,
    label: &str,
) -> Result<(), SeedError> {
    let (city, state) = pick(rng, CITIES);
    let service = AddressService::new(pool);
    service
        .create(
            owner,
            SaveAddress {
                label: Some(label.to_owned()),
                is_default,
                zip_code: digits(rng, 8),
                street: (*pick(rng, STREETS)).to_owned(),
                number: rng.random_range(1..2000).to_string(),
                neighborhood: Some("Centro".to_owned()),
                complement: None,
                reference: None,
                city: (*city).to_owned(),
                state: (*state).to_owned(),
                latitude: None,
                longitude: None,
            },
        )
        .await?;

    Ok(())
}

async fn place_order(
    pool: &PgPool,
    rng: &mut StdRng,
    store: &Store,
    account: &Account,
) -> Result<(), SeedError> {
    let products = db::products::list_for_store(pool, store.id, true).await?;
    if products.is_empty() {
        return Ok(());
    }

    let line_count = rng.random_range(1..=3.min(products.len()));
    let items: Vec<CartLine> = (0..line_count)
        .map(|_| {
            let product: &Product = pick(rng, &products);
            CartLine {
                product_uuid: product.uuid,
                quantity: rng.random_range(1..=3),
            }
        })
        .collect();

    // Prefer the client's default address for realism.
    let addresses = db::addresses::list_for_owner(pool, AddressOwner::Account(account.id)).await?;
    let address = addresses.first();

    let (city, state) = pick(rng, CITIES);
    let input = CreateOrder {
        store_uuid: store.uuid,
        account_uuid: account.uuid,
        items,
        notes: None,
        address: address.map_or_else(
            || DeliveryAddressInput {
                zip_code: Some(digits(rng, 8)),
                street: Some((*pick(rng, STREETS)).to_owned()),
                number: Some("100".to_owned()),
                city: Some((*city).to_owned()),
                state: Some((*state).to_owned()),
                ..Default::default()
            },
            |a| DeliveryAddressInput {
                zip_code: Some(a.zip_code.as_str().to_owned()),
                street: Some(a.street.clone()),
                number: Some(a.number.clone()),
                neighborhood: a.neighborhood.clone(),
                complement: a.complement.clone(),
                reference: a.reference.clone(),
                city: Some(a.city.clone()),
                state: Some(a.state.as_str().to_owned()),
                latitude: a.latitude,
                longitude: a.longitude,
            },
        ),
    };

    let service = OrderService::new(pool);
    service.create_order(input).await?;
    Ok(())
}
