use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use transfer_ledger::domain::account::Balance;
use transfer_ledger::domain::ports::{LedgerBracket, LedgerStore};
use transfer_ledger::{InMemoryLedgerStore, LedgerError, TransferEngine};

mod common;
use common::amount;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_transfers_are_not_lost() {
    let engine = Arc::new(TransferEngine::in_memory());
    let x = engine.create_account(Balance::new(dec!(1000))).await;
    let y = engine.create_account(Balance::new(dec!(3.5))).await;
    let (from, to) = (x.id, y.id);

    let n = 200;
    let handles: Vec<_> = (0..n)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.transfer_money(from, to, amount(dec!(2.5))).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let k = dec!(2.5);
    let y_after = engine.get_account(y.id).await.unwrap();
    let x_after = engine.get_account(x.id).await.unwrap();
    assert_eq!(y_after.balance.value(), dec!(3.5) + Decimal::from(n) * k);
    assert_eq!(x_after.balance.value(), dec!(1000) - Decimal::from(n) * k);
    assert_eq!(engine.get_transactions_for_account(y.id).await.len(), n);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overdraw_race_allows_exactly_one_winner() {
    let engine = Arc::new(TransferEngine::in_memory());
    let source = engine.create_account(Balance::new(dec!(100))).await;
    let sink = engine.create_account(Balance::ZERO).await;
    let (from, to) = (source.id, sink.id);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .transfer_money(from, to, amount(dec!(100)))
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(LedgerError::InsufficientBalance(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(succeeded, 1);
    assert!(engine.get_account(source.id).await.unwrap().balance.is_zero());
    assert_eq!(
        engine.get_account(sink.id).await.unwrap().balance,
        Balance::new(dec!(100))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_random_transfers_conserve_total() {
    let engine = Arc::new(TransferEngine::in_memory());
    let mut ids = Vec::new();
    for _ in 0..8 {
        ids.push(engine.create_account(Balance::new(dec!(50.00))).await.id);
    }
    let ids = Arc::new(ids);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let ids = Arc::clone(&ids);
            tokio::spawn(async move {
                for _ in 0..50 {
                    let (from, to, cents) = {
                        let mut rng = rand::thread_rng();
                        (
                            ids[rng.gen_range(0..ids.len())],
                            ids[rng.gen_range(0..ids.len())],
                            rng.gen_range(1..=2_000i64),
                        )
                    };
                    let value = Decimal::new(cents, 2);
                    match engine.transfer_money(from, to, amount(value)).await {
                        Ok(_) | Err(LedgerError::InsufficientBalance(_)) => {}
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let accounts = engine.accounts().await;
    let total: Decimal = accounts.iter().map(|a| a.balance.value()).sum();
    assert_eq!(total, dec!(400.00));
    assert!(accounts.iter().all(|a| a.balance.value() >= Decimal::ZERO));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_account_creation_assigns_unique_ids() {
    let engine = Arc::new(TransferEngine::in_memory());

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.create_account(Balance::ZERO).await.id })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }
    assert_eq!(ids.len(), 64);
    assert_eq!(ids.iter().map(|id| id.0).max(), Some(64));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_second_bracket_waits_for_first() {
    let store = InMemoryLedgerStore::new();
    let id = store.create_account(Balance::new(dec!(10))).await.id;

    let mut first = store.begin_transaction().await.unwrap();
    first.set_balance(id, Balance::new(dec!(4)));

    let waiting = {
        let store = store.clone();
        tokio::spawn(async move {
            let bracket = store.begin_transaction().await.unwrap();
            let seen = bracket.get_account(id).unwrap().balance;
            bracket.commit();
            seen
        })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!waiting.is_finished());

    first.rollback();
    assert_eq!(waiting.await.unwrap(), Balance::new(dec!(10)));
}
