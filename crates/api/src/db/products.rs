//! Database operations for the catalog (sections and products).

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use prato_core::{ProductId, SectionForm, SectionId, StoreId};

use super::RepositoryError;
use crate::models::{Product, Section};

const SECTION_COLUMNS: &str = "id, uuid, store_id, title, position, min_products, max_products, \
     is_active, is_required, is_highlighted, form, textbox_help_text, \
     created_at, updated_at";

const PRODUCT_COLUMNS: &str = "id, uuid, store_id, section_id, name, description, price, \
     discount_percentage, position, is_active, picture, thumbnail, \
     created_at, updated_at";

/// Parameters for creating a section.
#[derive(Debug)]
pub struct CreateSection {
    pub store_id: StoreId,
    pub title: String,
    pub position: i32,
    pub min_products: i32,
    pub max_products: i32,
    pub is_active: bool,
    pub is_required: bool,
    pub is_highlighted: bool,
    pub form: SectionForm,
    pub textbox_help_text: Option<String>,
}

/// Parameters for creating a product.
#[derive(Debug)]
pub struct CreateProduct {
    pub store_id: StoreId,
    pub section_id: SectionId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discount_percentage: Decimal,
    pub position: i32,
    pub is_active: bool,
    pub picture: Option<String>,
    pub thumbnail: Option<String>,
}

/// Get a product by its public UUID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_by_uuid(pool: &PgPool, uuid: Uuid) -> Result<Option<Product>, RepositoryError> {
    let query = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE uuid = $1");
    let product = sqlx::query_as::<_, Product>(&query)
        .bind(uuid)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// List a store's products ordered by display position.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_store(
    pool: &PgPool,
    store_id: StoreId,
    only_active: bool,
) -> Result<Vec<Product>, RepositoryError> {
    let query = format!(
        "SELECT {PRODUCT_COLUMNS}
         FROM product
         WHERE store_id = $1 AND ($2 = FALSE OR is_active)
         ORDER BY position, id"
    );
    let products = sqlx::query_as::<_, Product>(&query)
        .bind(store_id)
        .bind(only_active)
        .fetch_all(pool)
        .await?;

    Ok(products)
}

/// List a store's sections ordered by display position.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_sections_for_store(
    pool: &PgPool,
    store_id: StoreId,
    only_active: bool,
) -> Result<Vec<Section>, RepositoryError> {
    let query = format!(
        "SELECT {SECTION_COLUMNS}
         FROM section
         WHERE store_id = $1 AND ($2 = FALSE OR is_active)
         ORDER BY position, id"
    );
    let sections = sqlx::query_as::<_, Section>(&query)
        .bind(store_id)
        .bind(only_active)
        .fetch_all(pool)
        .await?;

    Ok(sections)
}

/// Resolve the requested product UUIDs against one store's *active*
/// catalog.
///
/// Products belonging to another store, inactive products and unknown
/// UUIDs are simply absent from the result; the order assembler compares
/// the result against the request to batch-report what is missing.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn resolve_active_for_store(
    conn: &mut PgConnection,
    store_id: StoreId,
    uuids: &[Uuid],
) -> Result<Vec<Product>, RepositoryError> {
    let query = format!(
        "SELECT {PRODUCT_COLUMNS}
         FROM product
         WHERE store_id = $1 AND is_active AND uuid = ANY($2)
         ORDER BY uuid"
    );
    let products = sqlx::query_as::<_, Product>(&query)
        .bind(store_id)
        .bind(uuids)
        .fetch_all(conn)
        .await?;

    Ok(products)
}

/// Insert a section.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_section(
    conn: &mut PgConnection,
    params: &CreateSection,
) -> Result<Section, RepositoryError> {
    let query = format!(
        "INSERT INTO section (store_id, title, position, min_products, max_products,
                              is_active, is_required, is_highlighted, form, textbox_help_text)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING {SECTION_COLUMNS}"
    );
    let section = sqlx::query_as::<_, Section>(&query)
        .bind(params.store_id)
        .bind(&params.title)
        .bind(params.position)
        .bind(params.min_products)
        .bind(params.max_products)
        .bind(params.is_active)
        .bind(params.is_required)
        .bind(params.is_highlighted)
        .bind(params.form)
        .bind(&params.textbox_help_text)
        .fetch_one(conn)
        .await?;

    Ok(section)
}

/// Insert a product.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_product(
    conn: &mut PgConnection,
    params: &CreateProduct,
) -> Result<Product, RepositoryError> {
    let query = format!(
        "INSERT INTO product (store_id, section_id, name, description, price,
                              discount_percentage, position, is_active, picture, thumbnail)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING {PRODUCT_COLUMNS}"
    );
    let product = sqlx::query_as::<_, Product>(&query)
        .bind(params.store_id)
        .bind(params.section_id)
        .bind(&params.name)
        .bind(&params.description)
        .bind(params.price)
        .bind(params.discount_percentage)
        .bind(params.position)
        .bind(params.is_active)
        .bind(&params.picture)
        .bind(&params.thumbnail)
        .fetch_one(conn)
        .await?;

    Ok(product)
}

/// Link a product to an extra section with its own display position.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the link already exists.
pub async fn link_product_section(
    conn: &mut PgConnection,
    product_id: ProductId,
    section_id: SectionId,
    position: i32,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO product_section (product_id, section_id, position)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(product_id)
    .bind(section_id)
    .bind(position)
    .execute(conn)
    .await
    .map_err(|e| RepositoryError::from_sqlx(e, "product already linked to section"))?;

    Ok(())
}

/// List the products shown in one section: its primary products plus the
/// ones linked through `product_section`, each ordered by the position
/// relevant to that section.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_section(
    pool: &PgPool,
    section_id: SectionId,
    only_active: bool,
) -> Result<Vec<Product>, RepositoryError> {
    let query = format!(
        "SELECT {columns}
         FROM (
             SELECT p.*, p.position AS display_position
             FROM product p
             WHERE p.section_id = $1
             UNION
             SELECT p.*, ps.position AS display_position
             FROM product p
             JOIN product_section ps ON ps.product_id = p.id
             WHERE ps.section_id = $1
         ) p
         WHERE ($2 = FALSE OR p.is_active)
         ORDER BY p.display_position, p.id",
        columns = PRODUCT_COLUMNS
    );
    let products = sqlx::query_as::<_, Product>(&query)
        .bind(section_id)
        .bind(only_active)
        .fetch_all(pool)
        .await?;

    Ok(products)
}
