use ambassador_engine::{
    db_types::{NewProduct, NewUser, OrderWithItems, Product, ReferralLink, User, UserInfoUpdate},
    payment_objects::{CheckoutSession, CheckoutSessionRequest},
    traits::{
        AmbassadorManagement,
        AmbassadorManagementError,
        CatalogManagement,
        CatalogManagementError,
        PaymentSessionProvider,
        UserManagement,
        UserManagementError,
    },
};
use mockall::mock;

mock! {
    pub Provider {}
    impl PaymentSessionProvider for Provider {
        type Error = String;
        async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<CheckoutSession, String>;
    }
}

mock! {
    pub AmbassadorStore {}
    impl AmbassadorManagement for AmbassadorStore {
        async fn fetch_ambassadors(&self) -> Result<Vec<User>, AmbassadorManagementError>;
        async fn fetch_completed_ambassador_orders(&self) -> Result<Vec<OrderWithItems>, AmbassadorManagementError>;
        async fn fetch_ambassador(&self, user_id: i64) -> Result<Option<User>, AmbassadorManagementError>;
        async fn fetch_links_for_user(&self, user_id: i64) -> Result<Vec<ReferralLink>, AmbassadorManagementError>;
        async fn fetch_completed_orders_for_user(&self, user_id: i64) -> Result<Vec<OrderWithItems>, AmbassadorManagementError>;
    }
}

mock! {
    pub CatalogStore {}
    impl CatalogManagement for CatalogStore {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogManagementError>;
        async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogManagementError>;
        async fn update_product(&self, product_id: i64, product: NewProduct) -> Result<Product, CatalogManagementError>;
        async fn delete_product(&self, product_id: i64) -> Result<(), CatalogManagementError>;
    }
}

mock! {
    pub UserStore {}
    impl UserManagement for UserStore {
        async fn fetch_user(&self, user_id: i64) -> Result<Option<User>, UserManagementError>;
        async fn insert_user(&self, user: NewUser) -> Result<User, UserManagementError>;
        async fn update_user_info(&self, user_id: i64, update: UserInfoUpdate) -> Result<User, UserManagementError>;
    }
}
