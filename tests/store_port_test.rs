use rust_decimal_macros::dec;
use transfer_ledger::domain::account::{Account, AccountId, Balance};
use transfer_ledger::domain::ports::{LedgerBracket, LedgerStore};
use transfer_ledger::{InMemoryLedgerStore, LedgerConfig, TransferEngine};

mod common;
use common::amount;

/// Opens one account and moves its whole balance to a fresh one through any store.
async fn drain_into_new_account<S: LedgerStore>(store: &S) -> (Account, Account) {
    let source = store.create_account(Balance::new(dec!(30))).await;
    let target = store.create_account(Balance::ZERO).await;

    let mut bracket = store.begin_transaction().await.unwrap();
    bracket.create_transaction(source.id, target.id, amount(dec!(30)));
    let source = bracket.set_balance(source.id, Balance::ZERO).unwrap();
    let target = bracket.set_balance(target.id, Balance::new(dec!(30))).unwrap();
    bracket.commit();

    (source, target)
}

#[tokio::test]
async fn test_store_through_generic_port() {
    let store = InMemoryLedgerStore::new();
    let (source, target) = drain_into_new_account(&store).await;

    assert_eq!(store.get_account(source.id).await, Some(source.clone()));
    assert_eq!(store.get_account(target.id).await, Some(target));
    assert_eq!(store.get_transactions_for_account(source.id).await.len(), 1);
}

#[tokio::test]
async fn test_store_is_shareable_across_tasks() {
    let store = InMemoryLedgerStore::new();

    let handle = {
        let store = store.clone();
        tokio::spawn(async move { drain_into_new_account(&store).await })
    };
    let (_, target) = handle.await.unwrap();

    // Clones share one ledger.
    assert_eq!(
        store.get_account(target.id).await.unwrap().balance,
        Balance::new(dec!(30))
    );
}

#[tokio::test]
async fn test_engine_over_seeded_store() {
    let config = LedgerConfig::default()
        .with_opening_balances([Balance::new(dec!(1000.12)), Balance::ZERO]);
    let engine = TransferEngine::new(InMemoryLedgerStore::with_config(config));

    let tx = engine
        .transfer_money(AccountId(1), AccountId(2), amount(dec!(1000.12)))
        .await
        .unwrap();
    assert_eq!(tx.amount.to_string(), "1000.12");

    let opened = engine.create_account(Balance::ZERO).await;
    assert_eq!(opened.id, AccountId(3));
    assert_eq!(engine.store().all_accounts().await.len(), 3);
}
