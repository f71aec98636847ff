//! Integration tests for the in-memory store.
//!
//! These tests exercise the store through the `Store` trait the way the
//! conversation engine does, including concurrent use from many tasks.

use std::collections::HashSet;
use std::sync::Arc;

use common::{OrderId, UserId};
use domain::{Answer, OrderDetails, OrderStatus, Role};
use store::{InMemoryStore, Store};

const OWNER: UserId = UserId::new(999);

fn details(answers: &[(&str, &str)]) -> OrderDetails {
    OrderDetails {
        service_key: "private_investigation".to_string(),
        service_label: "Private investigation".to_string(),
        sub_service_key: None,
        sub_service_label: None,
        answers: answers
            .iter()
            .map(|(key, text)| Answer {
                key: key.to_string(),
                question: format!("{key}?"),
                text: text.to_string(),
            })
            .collect(),
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn order_ids_stay_unique_under_concurrent_inserts() {
        let store = Arc::new(InMemoryStore::new(OWNER));
        for id in 1..=8 {
            store.register_user(UserId::new(id), None, None).await;
        }

        let mut handles = Vec::new();
        for task in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for _ in 0..250 {
                    let id = store
                        .add_order(UserId::new(task + 1), details(&[("q", "a")]))
                        .await
                        .unwrap();
                    ids.push(id);
                }
                ids
            }));
        }

        let mut all: Vec<OrderId> = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        let unique: HashSet<_> = all.iter().cloned().collect();
        assert_eq!(all.len(), 2_000);
        assert_eq!(unique.len(), all.len());
        assert_eq!(store.order_count().await, 2_000);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_registrations_create_one_user_and_one_referral() {
        let store = Arc::new(InMemoryStore::new(OWNER));
        store.register_user(UserId::new(1), None, None).await;
        store.register_user(UserId::new(3), None, None).await;

        let mut handles = Vec::new();
        for n in 0..16 {
            let store = store.clone();
            let referrer = if n % 2 == 0 { 1 } else { 3 };
            handles.push(tokio::spawn(async move {
                store
                    .register_user(UserId::new(2), None, Some(UserId::new(referrer)))
                    .await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.user_count().await, 3);

        let from_1 = store.list_referrals(UserId::new(1), 1, 10).await.total_items;
        let from_3 = store.list_referrals(UserId::new(3), 1, 10).await.total_items;
        assert_eq!(from_1 + from_3, 1);
    }
}

mod pagination {
    use super::*;

    async fn seeded() -> (InMemoryStore, Vec<OrderId>) {
        let store = InMemoryStore::new(OWNER);
        store.register_user(UserId::new(1), None, None).await;
        store.register_user(UserId::new(2), None, None).await;
        let mut ids = Vec::new();
        for n in 0..11 {
            let user = if n % 2 == 0 { 1 } else { 2 };
            let id = store
                .add_order(UserId::new(user), details(&[("n", n.to_string().as_str())]))
                .await
                .unwrap();
            if n % 3 == 0 {
                store
                    .update_status(&id, &OrderStatus::new("in_progress"))
                    .await
                    .unwrap();
            }
            ids.push(id);
        }
        (store, ids)
    }

    #[tokio::test]
    async fn concatenated_pages_reproduce_the_filtered_set() {
        let (store, ids) = seeded().await;
        let in_progress = OrderStatus::new("in_progress");
        let expected: Vec<_> = ids
            .iter()
            .enumerate()
            .filter(|(n, _)| n % 3 == 0)
            .map(|(_, id)| id.clone())
            .collect();

        for page_size in 1..=5 {
            let first = store.list_orders(Some(&in_progress), 1, page_size).await;
            let mut joined = Vec::new();
            for page in 1..=first.total_pages {
                let page = store.list_orders(Some(&in_progress), page, page_size).await;
                joined.extend(page.items.into_iter().map(|o| o.id));
            }
            assert_eq!(joined, expected, "page size {page_size}");
            assert_eq!(first.total_pages, expected.len().div_ceil(page_size));
        }
    }

    #[tokio::test]
    async fn unfiltered_listing_is_in_creation_order() {
        let (store, ids) = seeded().await;
        let page = store.list_orders(None, 1, 100).await;
        let listed: Vec<_> = page.items.into_iter().map(|o| o.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn empty_filter_result_has_zero_pages() {
        let (store, _) = seeded().await;
        let page = store
            .list_orders(Some(&OrderStatus::new("cancelled")), 1, 5)
            .await;
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn user_orders_only_include_that_user() {
        let (store, _) = seeded().await;
        let page = store.list_user_orders(UserId::new(2), 1, 3).await;
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 2);
        assert!(page.items.iter().all(|o| o.user_id == UserId::new(2)));
    }
}

mod roles {
    use super::*;

    #[tokio::test]
    async fn owner_role_is_restored_on_registration() {
        let store = InMemoryStore::new(OWNER);
        store.register_user(OWNER, None, None).await;
        // Granting never downgrades the owner...
        assert!(!store.grant_admin(OWNER).await);
        // ...and re-registration keeps asserting it.
        store.register_user(OWNER, Some("boss".into()), None).await;
        assert_eq!(store.get_role(OWNER).await, Role::Owner);
    }

    #[tokio::test]
    async fn registration_is_idempotent_on_role_and_referrer() {
        let store = InMemoryStore::new(OWNER);
        store.register_user(UserId::new(1), None, None).await;
        store.register_user(UserId::new(5), None, None).await;
        store
            .register_user(UserId::new(2), None, Some(UserId::new(1)))
            .await;
        assert!(store.grant_admin(UserId::new(2)).await);

        for referrer in [None, Some(UserId::new(5)), Some(UserId::new(2))] {
            assert_eq!(store.register_user(UserId::new(2), None, referrer).await, None);
            let user = store.get_user(UserId::new(2)).await.unwrap();
            assert_eq!(user.referrer_id, Some(UserId::new(1)));
            assert_eq!(user.role, Role::Admin);
        }
    }

    #[tokio::test]
    async fn list_all_users_in_registration_order() {
        let store = InMemoryStore::new(OWNER);
        for id in [5, 3, 9] {
            store.register_user(UserId::new(id), None, None).await;
        }
        let ids: Vec<i64> = store
            .list_all_users()
            .await
            .into_iter()
            .map(|u| u.id.get())
            .collect();
        assert_eq!(ids, vec![5, 3, 9]);
    }
}
