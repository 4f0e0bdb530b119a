//! 合成コレクションの値型が共有するストレージと、書き込み時の複製 (copy-on-write) を扱うモジュール
//! * 値型を複製してもストレージは複製されず、参照カウントだけが増える
//! * 構成要素を書き換えるときに、ストレージが他の値と共有されていれば先に複製する
//! * 共有されていない場合はその場で書き換え、キャッシュを全て破棄する

use super::*;
use crate::logging::diagnostics;

use std::sync::Arc;

/// 合成コレクションのストレージが満たす性質
pub trait CompositeStorage {
	/// 構成要素のタプル
	type Constituents;
	/// ログ出力に用いる種別名
	const KIND:&'static str;

	/// 構成要素から、キャッシュが空の新しいストレージを生成します
	fn from_constituents(constituents:Self::Constituents) -> Self;
	/// 構成要素を参照します
	fn constituents(&self) -> &Self::Constituents;
	/// 構成要素を書き換え可能な参照で返します。書き換えた後は必ず `invalidate` を呼ぶこと
	fn constituents_mut(&mut self) -> &mut Self::Constituents;
	/// ストレージを構成要素に分解します
	fn into_constituents(self) -> Self::Constituents;
	/// 構成要素から計算される全てのキャッシュを破棄します
	fn invalidate(&mut self);

	/// * `K` 番目の構成要素だけを置き換え、キャッシュが空の新しいストレージを生成します
	/// * 置き換えられる構成要素は複製されない
	fn with<const K:usize>(&self,value:<Self::Constituents as Slot<K>>::Item) -> Self
	where Self: Sized, Self::Constituents: WithSlot<K> {
		Self::from_constituents(<Self::Constituents as WithSlot<K>>::with_slot(self.constituents(),value))
	}
}

/// 複数の値型から参照されうるストレージ
pub(crate) struct SharedStorage<S> {
	storage: Arc<S>
}

impl<S> Clone for SharedStorage<S> {
	fn clone(&self) -> Self {
		Self { storage: Arc::clone(&self.storage) }
	}
}

impl<S: CompositeStorage> SharedStorage<S> {

	pub(crate) fn new(constituents:S::Constituents) -> Self {
		Self { storage: Arc::new(S::from_constituents(constituents)) }
	}

	#[inline]
	pub(crate) fn get(&self) -> &S {
		&self.storage
	}

	/// 2つの値が同じストレージを共有しているかどうか
	pub(crate) fn ptr_eq(&self,other:&Self) -> bool {
		Arc::ptr_eq(&self.storage,&other.storage)
	}

	/// 他の値とストレージを共有していないかどうか
	pub(crate) fn is_unique(&self) -> bool {
		Arc::strong_count(&self.storage)==1
	}

	/// * ストレージを書き換え可能な参照で返します
	/// * 他の値と共有されていれば、 `fork` により複製したストレージに差し替えてから返す
	fn unique_or_fork(&mut self,fork:impl FnOnce(&S)->S) -> &mut S {
		if !self.is_unique() {
			diagnostics::storage_forked(S::KIND);
			self.storage = Arc::new(fork(&self.storage));
		}
		Arc::get_mut(&mut self.storage)
		.unwrap_or_else(|| internal_inconsistency!("unique_or_fork","{}: 複製したストレージが一意になっていません",S::KIND) )
	}

	/// 構成要素を書き換え、全てのキャッシュを破棄します
	pub(crate) fn modify<R>(&mut self,f:impl FnOnce(&mut S::Constituents)->R) -> R
	where S::Constituents: Clone {
		let storage = self.unique_or_fork(|s| S::from_constituents(s.constituents().clone()) );
		let result = f(storage.constituents_mut());
		storage.invalidate();
		result
	}

	/// * `K` 番目の構成要素を置き換えます
	/// * 共有されていれば `CompositeStorage::with` で複製し、置き換えられる構成要素は複製しない
	pub(crate) fn set_slot<const K:usize>(&mut self,value:<S::Constituents as Slot<K>>::Item)
	where S::Constituents: WithSlot<K> {
		match Arc::get_mut(&mut self.storage) {
			Some(storage) => {
				*<S::Constituents as Slot<K>>::slot_mut(storage.constituents_mut()) = value;
				storage.invalidate();
			},
			None => {
				diagnostics::storage_forked(S::KIND);
				self.storage = Arc::new(self.storage.with::<K>(value));
			}
		}
	}

	/// `K` 番目の構成要素だけを置き換えた、新しいストレージを生成します
	pub(crate) fn with_slot<const K:usize>(&self,value:<S::Constituents as Slot<K>>::Item) -> Self
	where S::Constituents: WithSlot<K> {
		Self { storage: Arc::new(self.storage.with::<K>(value)) }
	}

	/// 構成要素を取り出します。共有されていれば複製する
	pub(crate) fn into_constituents(self) -> S::Constituents
	where S::Constituents: Clone {
		match Arc::try_unwrap(self.storage) {
			Ok(storage) => storage.into_constituents(),
			Err(shared) => shared.constituents().clone()
		}
	}

}



#[cfg(test)]
mod tests {
	use super::*;

	/// 書き換え回数を数えるだけのストレージ
	struct Counting {
		values: (Vec<u8>,String),
		invalidated: usize
	}

	impl CompositeStorage for Counting {
		type Constituents = (Vec<u8>,String);
		const KIND:&'static str = "Counting";
		fn from_constituents(values:Self::Constituents) -> Self { Self { values, invalidated: 0 } }
		fn constituents(&self) -> &Self::Constituents { &self.values }
		fn constituents_mut(&mut self) -> &mut Self::Constituents { &mut self.values }
		fn into_constituents(self) -> Self::Constituents { self.values }
		fn invalidate(&mut self) { self.invalidated += 1; }
	}

	#[test]
	fn unique_storage_is_mutated_in_place() {
		let mut a = SharedStorage::<Counting>::new((vec![1],"x".to_string()));
		a.modify(|c| c.0.push(2) );
		a.modify(|c| c.1.push('y') );
		assert!(a.is_unique());
		assert_eq!(a.get().invalidated,2);
		assert_eq!(a.get().values,(vec![1,2],"xy".to_string()));
	}

	#[test]
	fn shared_storage_is_forked_before_mutation() {
		let a = SharedStorage::<Counting>::new((vec![1],"x".to_string()));
		let mut b = a.clone();
		assert!(a.ptr_eq(&b));
		b.set_slot::<1>("z".to_string());
		assert!(!a.ptr_eq(&b));
		assert_eq!(a.get().values.1,"x");
		assert_eq!(b.get().values.1,"z");
		assert_eq!(b.get().invalidated,0);
		b.set_slot::<0>(vec![7]);
		assert!(b.is_unique());
		assert_eq!(b.get().invalidated,1);
		let c = a.with_slot::<0>(vec![]);
		assert_eq!(c.into_constituents(),(vec![],"x".to_string()));
		assert_eq!(a.into_constituents(),(vec![1],"x".to_string()));
	}
}
