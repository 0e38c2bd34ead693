use std::sync::atomic::Ordering;

use cucumber::given;

use crate::cucumber::{settlement_world::SettlementSystem, SettlementWorld};

#[given("a seeded store")]
async fn seeded_store(world: &mut SettlementWorld) {
    let system = SettlementSystem::new().await;
    world.system = Some(system);
}

#[given("the payment provider is down")]
async fn provider_down(world: &mut SettlementWorld) {
    world.system().provider.fail.store(true, Ordering::SeqCst);
}
