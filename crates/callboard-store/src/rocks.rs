//! `RocksDB` storage implementation.
//!
//! `RocksDB` has no conditional update, so every read-modify-write runs under a
//! per-column-family mutex. Locks are held for one store operation only.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use callboard_core::{
    Achievement, AchievementUnlock, CallStat, CoinTransaction, ItemId, LikeCount, LikeToggle,
    Profile, ProfileFlag, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{AchievementStore, CallStatStore, LedgerStore, LikeStore};

type Db = DBWithThreadMode<MultiThreaded>;

/// Outcome of a profile mutation: the caller's result plus an optional journal entry.
type ProfileChange<T> = Result<(T, Option<CoinTransaction>)>;

#[derive(Default)]
struct WriteLocks {
    profiles: Mutex<()>,
    stats: Mutex<()>,
    achievements: Mutex<()>,
    likes: Mutex<()>,
}

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<Db>,
    locks: WriteLocks,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = Db::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            locks: WriteLocks::default(),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn lock(mutex: &Mutex<()>) -> Result<MutexGuard<'_, ()>> {
        mutex
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    fn get_cbor<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Keys of a column family starting with `prefix`, in key order.
    fn keys_with_prefix(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut out = Vec::new();
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push(key.to_vec());
        }
        Ok(out)
    }

    fn stored_profile(&self, user_id: UserId) -> Result<Option<Profile>> {
        self.get_cbor(cf::PROFILES, &keys::profile_key(user_id))
    }

    /// Read-modify-write of one profile row under the profile lock.
    ///
    /// Absent rows start from [`Profile::new`]. When `change` fails nothing is
    /// written. The profile and its journal entry land in one batch.
    fn modify_profile<T>(
        &self,
        user_id: UserId,
        change: impl FnOnce(&mut Profile) -> ProfileChange<T>,
    ) -> Result<T> {
        let _guard = Self::lock(&self.locks.profiles)?;

        let mut profile = self
            .stored_profile(user_id)?
            .unwrap_or_else(|| Profile::new(user_id));
        let (out, transaction) = change(&mut profile)?;
        profile.updated_at = Utc::now();

        let cf_profiles = self.cf(cf::PROFILES)?;
        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_profiles,
            keys::profile_key(user_id),
            Self::serialize(&profile)?,
        );

        if let Some(tx) = transaction {
            let cf_tx = self.cf(cf::COIN_TRANSACTIONS)?;
            let cf_by_user = self.cf(cf::COIN_TRANSACTIONS_BY_USER)?;
            batch.put_cf(&cf_tx, keys::transaction_key(&tx.id), Self::serialize(&tx)?);
            batch.put_cf(&cf_by_user, keys::user_transaction_key(user_id, &tx.id), []);
        }

        self.db.write(batch)?;
        Ok(out)
    }

    fn ensure_positive(amount: i64) -> Result<()> {
        if amount > 0 {
            Ok(())
        } else {
            Err(StoreError::InvalidAmount(amount))
        }
    }

    fn get_hearts(&self, item_id: ItemId) -> Result<Option<u64>> {
        self.get_cbor(cf::LIKES, &keys::like_key(item_id))
    }
}

impl LedgerStore for RocksStore {
    fn get_balance(&self, user_id: UserId) -> Result<i64> {
        Ok(self.get_profile(user_id)?.coins)
    }

    fn get_profile(&self, user_id: UserId) -> Result<Profile> {
        Ok(self
            .stored_profile(user_id)?
            .unwrap_or_else(|| Profile::new(user_id)))
    }

    fn debit(&self, user_id: UserId, amount: i64) -> Result<i64> {
        Self::ensure_positive(amount)?;
        self.modify_profile(user_id, |profile| {
            if !profile.can_afford(amount) {
                return Err(StoreError::InsufficientCoins {
                    balance: profile.coins,
                    required: amount,
                });
            }
            profile.coins -= amount;
            let tx = CoinTransaction::call_charge(user_id, amount, profile.coins);
            Ok((profile.coins, Some(tx)))
        })
    }

    fn credit(&self, user_id: UserId, amount: i64) -> Result<i64> {
        Self::ensure_positive(amount)?;
        self.modify_profile(user_id, |profile| {
            profile.coins = profile
                .coins
                .checked_add(amount)
                .ok_or(StoreError::InvalidAmount(amount))?;
            let tx = CoinTransaction::reward(user_id, amount, profile.coins);
            Ok((profile.coins, Some(tx)))
        })
    }

    fn get_flag(&self, user_id: UserId, flag: ProfileFlag) -> Result<bool> {
        Ok(self.get_profile(user_id)?.flag(flag))
    }

    fn set_flag(&self, user_id: UserId, flag: ProfileFlag, value: bool) -> Result<()> {
        self.modify_profile(user_id, |profile| {
            profile.set_flag(flag, value);
            Ok(((), None))
        })
    }

    fn toggle_flag(&self, user_id: UserId, flag: ProfileFlag) -> Result<bool> {
        self.modify_profile(user_id, |profile| {
            let value = !profile.flag(flag);
            profile.set_flag(flag, value);
            Ok((value, None))
        })
    }

    fn claim_share_bonus(&self, user_id: UserId, amount: i64) -> Result<i64> {
        Self::ensure_positive(amount)?;
        self.modify_profile(user_id, |profile| {
            if profile.has_shared_post {
                return Err(StoreError::AlreadyClaimed {
                    user_id: user_id.to_string(),
                });
            }
            profile.coins = profile
                .coins
                .checked_add(amount)
                .ok_or(StoreError::InvalidAmount(amount))?;
            profile.has_shared_post = true;
            let tx = CoinTransaction::share_bonus(user_id, amount, profile.coins);
            Ok((profile.coins, Some(tx)))
        })
    }

    fn list_transactions(
        &self,
        user_id: UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CoinTransaction>> {
        let mut index_keys =
            self.keys_with_prefix(cf::COIN_TRANSACTIONS_BY_USER, &keys::user_prefix(user_id))?;

        // ULIDs sort chronologically; newest first
        index_keys.reverse();

        let mut transactions = Vec::new();
        for key in index_keys.into_iter().skip(offset).take(limit) {
            let tx_id = keys::extract_transaction_id(&key)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            if let Some(tx) = self.get_cbor(cf::COIN_TRANSACTIONS, &keys::transaction_key(&tx_id))? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }
}

impl CallStatStore for RocksStore {
    fn increment_call_count(&self, user_id: UserId) -> Result<u64> {
        let _guard = Self::lock(&self.locks.stats)?;

        let key = keys::call_stat_key(user_id);
        let mut stat = self
            .get_cbor::<CallStat>(cf::CALL_STATS, &key)?
            .unwrap_or(CallStat {
                user_id,
                call_count: 0,
            });
        stat.call_count += 1;

        let cf = self.cf(cf::CALL_STATS)?;
        self.db.put_cf(&cf, key, Self::serialize(&stat)?)?;

        Ok(stat.call_count)
    }

    fn get_call_count(&self, user_id: UserId) -> Result<u64> {
        Ok(self
            .get_cbor::<CallStat>(cf::CALL_STATS, &keys::call_stat_key(user_id))?
            .map_or(0, |s| s.call_count))
    }

    fn all_counts(&self) -> Result<Vec<CallStat>> {
        let cf = self.cf(cf::CALL_STATS)?;

        // Keys iterate in ascending user id order; the stable sort keeps it for ties
        let mut stats = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item?;
            stats.push(Self::deserialize::<CallStat>(&value)?);
        }
        stats.sort_by(|a, b| b.call_count.cmp(&a.call_count));

        Ok(stats)
    }
}

impl AchievementStore for RocksStore {
    fn has_unlocked(&self, user_id: UserId, achievement: Achievement) -> Result<bool> {
        let cf = self.cf(cf::ACHIEVEMENTS)?;
        Ok(self
            .db
            .get_pinned_cf(&cf, keys::achievement_key(user_id, achievement))?
            .is_some())
    }

    fn unlock(
        &self,
        user_id: UserId,
        achievement: Achievement,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let _guard = Self::lock(&self.locks.achievements)?;

        if self.has_unlocked(user_id, achievement)? {
            return Ok(false);
        }

        let record = AchievementUnlock {
            user_id,
            achievement,
            obtained_at: at,
        };
        let cf = self.cf(cf::ACHIEVEMENTS)?;
        self.db.put_cf(
            &cf,
            keys::achievement_key(user_id, achievement),
            Self::serialize(&record)?,
        )?;

        Ok(true)
    }

    fn list_for(&self, user_id: UserId) -> Result<Vec<AchievementUnlock>> {
        let cf = self.cf(cf::ACHIEVEMENTS)?;
        let prefix = keys::user_prefix(user_id);

        let mut unlocks = Vec::new();
        for item in self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            match Self::deserialize::<AchievementUnlock>(&value) {
                Ok(unlock) => unlocks.push(unlock),
                // Codes removed from the rule table stay on disk but are not reported
                Err(e) => tracing::warn!(user_id = %user_id, error = %e, "Skipping unreadable unlock record"),
            }
        }

        Ok(unlocks)
    }

    fn unlocked_at(
        &self,
        user_id: UserId,
        achievement: Achievement,
    ) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .get_cbor::<AchievementUnlock>(
                cf::ACHIEVEMENTS,
                &keys::achievement_key(user_id, achievement),
            )?
            .map(|u| u.obtained_at))
    }
}

impl LikeStore for RocksStore {
    fn seed_items(&self, items: &[ItemId]) -> Result<usize> {
        let _guard = Self::lock(&self.locks.likes)?;

        let cf = self.cf(cf::LIKES)?;
        let mut batch = WriteBatch::default();
        let mut created = 0;
        for &item_id in items {
            if self.get_hearts(item_id)?.is_none() {
                batch.put_cf(&cf, keys::like_key(item_id), Self::serialize(&0_u64)?);
                created += 1;
            }
        }
        self.db.write(batch)?;

        Ok(created)
    }

    fn list_likes(&self) -> Result<Vec<LikeCount>> {
        let cf = self.cf(cf::LIKES)?;

        let mut likes = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, value) = item?;
            let player_id =
                ItemId::from_bytes(&key).map_err(|e| StoreError::Serialization(e.to_string()))?;
            likes.push(LikeCount {
                player_id,
                hearts: Self::deserialize(&value)?,
            });
        }

        Ok(likes)
    }

    fn toggle_like(&self, item_id: ItemId, user_id: UserId) -> Result<LikeToggle> {
        let _guard = Self::lock(&self.locks.likes)?;

        let hearts = self.get_hearts(item_id)?.ok_or_else(|| StoreError::NotFound {
            entity: "item",
            id: item_id.to_string(),
        })?;

        let cf_likes = self.cf(cf::LIKES)?;
        let cf_user_likes = self.cf(cf::USER_LIKES)?;
        let vote_key = keys::user_like_key(user_id, item_id);
        let already_liked = self.db.get_pinned_cf(&cf_user_likes, &vote_key)?.is_some();

        let mut batch = WriteBatch::default();
        let (hearts, liked) = if already_liked {
            batch.delete_cf(&cf_user_likes, &vote_key);
            (hearts.saturating_sub(1), false)
        } else {
            batch.put_cf(&cf_user_likes, &vote_key, []);
            (hearts + 1, true)
        };
        batch.put_cf(&cf_likes, keys::like_key(item_id), Self::serialize(&hearts)?);
        self.db.write(batch)?;

        Ok(LikeToggle { hearts, liked })
    }

    fn liked_items(&self, user_id: UserId) -> Result<Vec<ItemId>> {
        self.keys_with_prefix(cf::USER_LIKES, &keys::user_prefix(user_id))?
            .iter()
            .map(|key| {
                keys::extract_item_id(key).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }
}
