//! Fixture data: a couple of ambassadors with referral links, an administrator and a small catalog.
use crate::{
    db_types::{NewProduct, NewUser, Product, ReferralLink, User},
    sqlite::db::links,
    traits::{CatalogManagement, UserManagement},
    SqliteDatabase,
};

#[derive(Debug, Clone)]
pub struct SeedData {
    pub admin: User,
    pub alice: User,
    pub bob: User,
    pub alice_link: ReferralLink,
    pub bob_link: ReferralLink,
    pub products: Vec<Product>,
}

pub fn new_product(title: &str, price: f64) -> NewProduct {
    NewProduct {
        title: title.to_string(),
        description: format!("{title} description"),
        image: format!("https://example.com/{}.png", title.to_lowercase().replace(' ', "_")),
        price,
    }
}

pub async fn create_link(db: &SqliteDatabase, code: &str, user_id: i64, product_ids: &[i64]) -> ReferralLink {
    let mut conn = db.pool().acquire().await.expect("Error acquiring connection");
    links::insert_link(code, user_id, product_ids, &mut conn).await.expect("Error creating referral link")
}

/// Seeds the database with ambassadors `alice` (link `alice1`) and `bob` (link `bob1`), an administrator, and three
/// products priced at 10.00, 25.50 and 99.99.
pub async fn seed_database(db: &SqliteDatabase) -> SeedData {
    let admin = db.insert_user(NewUser::new("Admin", "Istrator", "admin@example.com", false)).await.expect("admin");
    let alice = db.insert_user(NewUser::new("Alice", "Ambassador", "alice@example.com", true)).await.expect("alice");
    let bob = db.insert_user(NewUser::new("Bob", "Builder", "bob@example.com", true)).await.expect("bob");
    let mut products = Vec::new();
    for (title, price) in [("Coffee Mug", 10.0), ("T-Shirt", 25.5), ("Hoodie", 99.99)] {
        products.push(db.insert_product(new_product(title, price)).await.expect("product"));
    }
    let ids = products.iter().map(|p| p.id).collect::<Vec<_>>();
    let alice_link = create_link(db, "alice1", alice.id, &ids).await;
    let bob_link = create_link(db, "bob1", bob.id, &ids[..2]).await;
    SeedData { admin, alice, bob, alice_link, bob_link, products }
}
