use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use clothing_store_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{Clothes, Users, clothes, clothes::LabelList, users},
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "Store Admin", "admin", "admin@example.com", "admin123", "admin").await?;
    let user_id = ensure_user(&orm, "Demo Shopper", "shopper", "user@example.com", "user123", "user").await?;
    seed_clothes(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    name: &str,
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present (role={})", existing.role);
        return Ok(existing.id);
    }

    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("hashing failed: {e}"))?;

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        address: Set(None),
        phone: Set(None),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Created user {email} (role={role})");
    Ok(user.id)
}

async fn seed_clothes(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let catalog = [
        (
            "Denim Jacket",
            Some("Levi's"),
            8900_i64,
            Some("Outerwear"),
            &["S", "M", "L", "XL"][..],
            &["Blue", "Black"][..],
        ),
        (
            "Graphic Tee",
            Some("Uniqlo"),
            1900,
            Some("Tops"),
            &["XS", "S", "M", "L"],
            &["White", "Navy", "Red"],
        ),
        (
            "Chino Trousers",
            Some("Dockers"),
            5400,
            Some("Bottoms"),
            &["30", "32", "34", "36"],
            &["Khaki", "Olive"],
        ),
        (
            "Wool Scarf",
            None,
            2500,
            Some("Accessories"),
            &[],
            &["Grey", "Burgundy"],
        ),
    ];

    for (name, brand, price, category, sizes, colors) in catalog {
        let exists = Clothes::find()
            .filter(clothes::Column::Name.eq(name))
            .one(orm)
            .await?;
        if exists.is_some() {
            continue;
        }

        clothes::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            brand: Set(brand.map(String::from)),
            price: Set(price),
            description: Set(None),
            image_url: Set(None),
            category: Set(category.map(String::from)),
            sizes: Set(LabelList(sizes.iter().map(|s| s.to_string()).collect())),
            colors: Set(LabelList(colors.iter().map(|c| c.to_string()).collect())),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}
