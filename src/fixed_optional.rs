//! 固定個数の `Option` のタプルを、値のあるスロットだけを並べたコレクションとして扱うモジュール
//!
//! ```rust
//! use composites::prelude::*;
//!
//! let o = FixedOptional::new( (Some(1),None::<char>,Some("three")) );
//! assert_eq!(o.len(),2);
//! assert_eq!(o.iter().collect::<Vec<_>>(),[Sum3::V0(&1),Sum3::V2(&"three")]);
//! ```

use super::*;
use crate::cow::{ CompositeStorage, SharedStorage };

use std::{
	cmp::Ordering,
	fmt::{ self, Debug },
	hash::{ Hash, Hasher },
	iter::FusedIterator
};

pub mod slots;
mod storage;

pub use slots::OptionalSlots;
pub use storage::OptionalStorage;

/// 値のあるスロットを指す添字。位置はスロットの番号
pub type OptionalIndex = CompositeIndex<usize>;



/// * 固定個数の `Option` のうち、値のあるものだけを順に並べたコレクション
/// * 値を複製してもストレージは共有され、スロットを書き換えるときに共有されていれば複製する
pub struct FixedOptional<C: OptionalSlots> {
	storage: SharedStorage<OptionalStorage<C>>
}

impl<C: OptionalSlots> FixedOptional<C> {

	/// `Option` のタプルから生成します
	pub fn new(constituents:C) -> Self {
		Self { storage: SharedStorage::new(constituents) }
	}

	/// `Option` のタプルを参照します
	pub fn constituents(&self) -> &C {
		self.storage.get().constituents()
	}

	/// `K` 番目のスロットを参照します
	pub fn constituent<const K:usize>(&self) -> &<C as Slot<K>>::Item
	where C: Slot<K> {
		<C as Slot<K>>::slot(self.constituents())
	}

	/// 共有されているストレージを参照します
	pub fn storage(&self) -> &OptionalStorage<C> {
		self.storage.get()
	}

	/// 値のあるスロットの個数
	pub fn len(&self) -> usize {
		self.storage.get().total_count()
	}

	/// 値のあるスロットが1つもないかどうか
	pub fn is_empty(&self) -> bool {
		self.storage.get().is_empty()
	}

	/// 値のある最初のスロットの添字。全て空であれば終端
	pub fn start_index(&self) -> OptionalIndex {
		self.storage.get().start_slot().into()
	}

	/// 終端の添字
	pub fn end_index(&self) -> OptionalIndex {
		OptionalIndex::End
	}

	/// 値のある次のスロットの添字。なければ終端
	#[track_caller]
	pub fn index_after(&self,index:&OptionalIndex) -> OptionalIndex {
		match index {
			OptionalIndex::Position(slot) => self.storage.get().slot_after(*slot).into(),
			OptionalIndex::End => contract_violation!("index_after","終端を越えて進めることはできません")
		}
	}

	/// 値のある前のスロットの添字。終端の前は値のある最後のスロットになる
	#[track_caller]
	pub fn index_before(&self,index:&OptionalIndex) -> OptionalIndex {
		let storage = self.storage.get();
		if *index==self.start_index() {
			contract_violation!("index_before","最初の添字より前に戻ることはできません");
		}
		match index {
			OptionalIndex::Position(slot) => storage.slot_before(*slot).into(),
			OptionalIndex::End => match storage.final_slot() {
				Some(slot) => OptionalIndex::Position(slot),
				None => contract_violation!("index_before","空のコレクションで終端から戻ることはできません")
			}
		}
	}

	/// 添字が指すスロットの値
	#[track_caller]
	pub fn at(&self,index:&OptionalIndex) -> C::Element<'_> {
		match index {
			OptionalIndex::Position(slot) => self.storage.get().element_at(*slot),
			OptionalIndex::End => contract_violation!("at","終端の添字は要素を指しません")
		}
	}

	/// 通し番号で値を取得します。範囲外であれば `None`
	pub fn get(&self,offset:usize) -> Option<C::Element<'_>> {
		(offset<self.len()).then(|| {
			let storage = self.storage.get();
			storage.element_at(storage.slot_for(offset))
		})
	}

	/// 値のある最初のスロットの値
	pub fn first(&self) -> Option<C::Element<'_>> {
		let storage = self.storage.get();
		storage.start_slot().map(|slot| storage.element_at(slot) )
	}

	/// 値のある最後のスロットの値
	pub fn last(&self) -> Option<C::Element<'_>> {
		let storage = self.storage.get();
		storage.final_slot().map(|slot| storage.element_at(slot) )
	}

	/// 添字の通し番号。終端の通し番号は要素数に等しい
	pub fn offset_of(&self,index:&OptionalIndex) -> usize {
		match index {
			OptionalIndex::Position(slot) => self.storage.get().linearize(*slot),
			OptionalIndex::End => self.len()
		}
	}

	/// 通し番号に対応する添字。要素数に等しければ終端になる
	#[track_caller]
	pub fn index_at(&self,offset:usize) -> OptionalIndex {
		let len = self.len();
		match offset.cmp(&len) {
			Ordering::Less => OptionalIndex::Position(self.storage.get().slot_for(offset)),
			Ordering::Equal => OptionalIndex::End,
			Ordering::Greater => contract_violation!("index_at","通し番号 {} は [0, {}] の範囲外です",offset,len)
		}
	}

	/// 添字を `distance` だけ進めた (負であれば戻した) 添字を返します
	#[track_caller]
	pub fn index_offset_by(&self,index:&OptionalIndex,distance:isize) -> OptionalIndex {
		let len = self.len();
		let origin = self.offset_of(index);
		let destination = origin.checked_add_signed(distance)
		.filter(|&d| d<=len )
		.unwrap_or_else(|| contract_violation!(
			"index_offset_by",
			"通し番号 {} から {} 進めた先は [0, {}] の範囲外です",
			origin,distance,len
		) );
		self.index_at(destination)
	}

	/// `from` から `to` までの距離 (`to` が前にあれば負)。要素数は高々7なので符号付きへの変換は失敗しない
	pub fn distance(&self,from:&OptionalIndex,to:&OptionalIndex) -> isize {
		self.offset_of(to) as isize - self.offset_of(from) as isize
	}

	/// 値のあるスロットの値を順に返すイテレータ
	pub fn iter(&self) -> Iter<'_,C> {
		let storage = self.storage.get();
		Iter {
			storage,
			front: storage.start_slot(),
			back: OptionalIndex::End,
			remaining: storage.total_count()
		}
	}

	/// 2つの値が同じストレージを共有しているかどうか
	pub fn shares_storage_with(&self,other:&Self) -> bool {
		self.storage.ptr_eq(&other.storage)
	}

	/// * スロットを書き換えます。ビットマスクは破棄される
	/// * ストレージが他の値と共有されていれば、書き換える前に複製する
	pub fn modify<R>(&mut self,f:impl FnOnce(&mut C)->R) -> R
	where C: Clone {
		self.storage.modify(f)
	}

	/// * `K` 番目のスロットを置き換えます
	/// * ストレージが共有されていれば他のスロットだけを複製する
	pub fn set_constituent<const K:usize>(&mut self,value:<C as Slot<K>>::Item)
	where C: WithSlot<K> {
		self.storage.set_slot::<K>(value)
	}

	/// `K` 番目のスロットだけを置き換えたコレクションを返します
	pub fn with_constituent<const K:usize>(&self,value:<C as Slot<K>>::Item) -> Self
	where C: WithSlot<K> {
		Self { storage: self.storage.with_slot::<K>(value) }
	}

	/// `Option` のタプルに分解します
	pub fn into_constituents(self) -> C
	where C: Clone {
		self.storage.into_constituents()
	}

}



impl<C: OptionalSlots> Clone for FixedOptional<C> {
	fn clone(&self) -> Self {
		Self { storage: self.storage.clone() }
	}
}

impl<C: OptionalSlots> From<C> for FixedOptional<C> {
	fn from(constituents:C) -> Self { Self::new(constituents) }
}

impl<C> PartialEq for FixedOptional<C> where C: OptionalSlots + PartialEq {
	fn eq(&self,other:&Self) -> bool {
		self.constituents()==other.constituents()
	}
}

impl<C> Eq for FixedOptional<C> where C: OptionalSlots + Eq {}

impl<C> PartialOrd for FixedOptional<C> where C: OptionalSlots + PartialOrd {
	fn partial_cmp(&self,other:&Self) -> Option<Ordering> {
		self.constituents().partial_cmp(other.constituents())
	}
}

impl<C> Ord for FixedOptional<C> where C: OptionalSlots + Ord {
	fn cmp(&self,other:&Self) -> Ordering {
		self.constituents().cmp(other.constituents())
	}
}

impl<C> Hash for FixedOptional<C> where C: OptionalSlots + Hash {
	fn hash<H: Hasher>(&self,state:&mut H) {
		self.constituents().hash(state);
	}
}

impl<C> Debug for FixedOptional<C> where C: OptionalSlots + Debug {
	fn fmt(&self,f:&mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FixedOptional")
		.field("constituents",self.constituents())
		.finish()
	}
}

#[cfg(feature="serde")]
mod serialization {
	use super::*;
	use serde::{ Serialize, Serializer, Deserialize, Deserializer };

	impl<C> Serialize for FixedOptional<C> where C: OptionalSlots + Serialize {
		fn serialize<S: Serializer>(&self,serializer:S) -> Result<S::Ok,S::Error> {
			self.constituents().serialize(serializer)
		}
	}

	impl<'de,C> Deserialize<'de> for FixedOptional<C> where C: OptionalSlots + Deserialize<'de> {
		fn deserialize<D: Deserializer<'de>>(deserializer:D) -> Result<Self,D::Error> {
			C::deserialize(deserializer).map(Self::new)
		}
	}
}



/// 値のあるスロットの値を順に返すイテレータ
pub struct Iter<'a,C: OptionalSlots> {
	storage: &'a OptionalStorage<C>,
	front: Option<usize>,
	back: OptionalIndex,
	remaining: usize
}

impl<'a,C: OptionalSlots> Iterator for Iter<'a,C> {
	type Item = C::Element<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining==0 { return None; }
		let slot = self.front.take()?;
		self.remaining -= 1;
		if self.remaining>0 {
			self.front = self.storage.slot_after(slot);
		}
		Some(self.storage.element_at(slot))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining,Some(self.remaining))
	}
}

impl<'a,C: OptionalSlots> DoubleEndedIterator for Iter<'a,C> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.remaining==0 { return None; }
		let slot = match self.back {
			OptionalIndex::Position(slot) => self.storage.slot_before(slot),
			OptionalIndex::End => self.storage.final_slot()
		}?;
		self.remaining -= 1;
		self.back = OptionalIndex::Position(slot);
		Some(self.storage.element_at(slot))
	}
}

impl<'a,C: OptionalSlots> ExactSizeIterator for Iter<'a,C> {}

impl<'a,C: OptionalSlots> FusedIterator for Iter<'a,C> {}

impl<'a,C: OptionalSlots> IntoIterator for &'a FixedOptional<C> {
	type Item = C::Element<'a>;
	type IntoIter = Iter<'a,C>;
	fn into_iter(self) -> Iter<'a,C> { self.iter() }
}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::{
		FixedOptional,
		OptionalIndex,
		OptionalSlots
	};
}



#[cfg(test)]
mod tests {
	use super::*;

	type Sparse = (Option<i32>,Option<char>,Option<i32>,Option<&'static str>);

	fn sparse() -> FixedOptional<Sparse> {
		FixedOptional::new( (Some(1),None,Some(3),Some("four")) )
	}

	#[test]
	fn only_present_slots_are_visited() {
		let o = sparse();
		assert_eq!(o.len(),3);
		assert_eq!(
			o.iter().collect::<Vec<_>>(),
			[Sum4::V0(&1),Sum4::V2(&3),Sum4::V3(&"four")]
		);
		assert_eq!(
			o.iter().rev().map(|e| e.variant() ).collect::<Vec<_>>(),
			[3,2,0]
		);
		assert_eq!(o.index_after(&OptionalIndex::Position(0)),OptionalIndex::Position(2));
		assert_eq!(o.index_after(&OptionalIndex::Position(3)),o.end_index());
		assert_eq!(o.index_before(&o.end_index()),OptionalIndex::Position(3));
		assert_eq!(o.index_before(&OptionalIndex::Position(2)),OptionalIndex::Position(0));
	}

	#[test]
	fn random_access_by_offset() {
		let o = sparse();
		assert_eq!(o.offset_of(&OptionalIndex::Position(3)),2);
		assert_eq!(o.index_at(1),OptionalIndex::Position(2));
		assert_eq!(o.get(2),Some(Sum4::V3(&"four")));
		assert_eq!(o.index_offset_by(&o.end_index(),-3),o.start_index());
		assert_eq!(o.distance(&o.end_index(),&OptionalIndex::Position(2)),-2);
	}

	#[test]
	fn homogeneous_slots_merge() {
		let o = FixedOptional::new( (None::<u8>,Some(2_u8),Some(5_u8)) );
		assert_eq!(o.iter().map(|e| *e.merge() ).sum::<u8>(),7);
		assert_eq!(o.first().map(Merge::merge),Some(&2));
	}

	#[test]
	fn all_absent_is_empty() {
		let o = FixedOptional::new( (None::<u8>,None::<u8>) );
		assert!(o.is_empty());
		assert_eq!(o.start_index(),o.end_index());
		assert_eq!(o.first(),None);
		assert_eq!(o.last(),None);
	}

	#[test]
	fn clones_holding_nan_are_not_equal() {
		let a = FixedOptional::new( (Some(f64::NAN),None::<u8>) );
		assert_ne!(a,a.clone());
	}

	#[test]
	fn copy_on_write_isolates_values() {
		let a = sparse();
		let mut b = a.clone();
		b.set_constituent::<1>(Some('z'));
		assert!(!a.shares_storage_with(&b));
		assert_eq!(a.len(),3);
		assert_eq!(b.len(),4);
		assert_eq!(b.at(&b.index_at(1)),Sum4::V1(&'z'));

		b.modify(|slots| slots.0 = None );
		assert_eq!(b.start_index(),OptionalIndex::Position(1));
		let c = b.with_constituent::<3>(None);
		assert_eq!(c.last(),Some(Sum4::V2(&3)));
		assert_eq!(b.last(),Some(Sum4::V3(&"four")));
	}

	#[test]
	#[should_panic(expected="[契約違反] index_before")]
	fn retreating_past_start_faults() {
		let o = sparse();
		o.index_before(&o.start_index());
	}

	#[test]
	#[should_panic(expected="[契約違反] at")]
	fn subscripting_end_faults() {
		let o = sparse();
		o.at(&o.end_index());
	}

	#[test]
	#[should_panic(expected="[契約違反] slot_after")]
	fn absent_position_faults() {
		let o = sparse();
		o.index_after(&OptionalIndex::Position(1));
	}

	#[cfg(feature="serde")]
	#[test]
	fn serializes_as_option_tuple() {
		let o = sparse();
		let json = serde_json::to_string(&o).expect("直列化できません");
		assert_eq!(json,r#"[1,null,3,"four"]"#);
		let p:FixedOptional<(Option<i32>,Option<char>,Option<i32>,Option<String>)> = serde_json::from_str(&json).expect("復元できません");
		assert_eq!(p.len(),3);
	}
}
