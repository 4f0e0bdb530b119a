//! 複数のコレクションを順に連結し、要素を複製せずに1つのコレクションとして扱うモジュール
//!
//! * `SumChain` は、どの構成要素の要素であるかを直和型 `SumN` で区別したまま返す
//! * `Chain` は、全ての構成要素の要素の型が同じ場合に、区別を忘れた要素を返す
//! * 空の構成要素は読み飛ばされ、全ての構成要素が空である場合に限り空になる
//!
//! ```rust
//! use composites::prelude::*;
//!
//! let c = Chain::new( (vec![1,2],Vec::<i32>::new(),[3]) );
//! assert_eq!(c.iter().copied().collect::<Vec<_>>(),[1,2,3]);
//!
//! let s = SumChain::new( (vec![1],vec!['a']) );
//! assert_eq!(s.iter().collect::<Vec<_>>(),[Sum2::V0(&1),Sum2::V1(&'a')]);
//! ```

use super::*;
use crate::{
	cow::{ CompositeStorage, SharedStorage },
	product::MAX_ARITY
};

use std::{
	cmp::Ordering,
	fmt::{ self, Debug },
	hash::{ Hash, Hasher },
	iter::FusedIterator,
	marker::PhantomData
};

pub mod constituents;
pub mod offsets;
mod storage;

pub use constituents::{
	ChainConstituents,
	BidirectionalChainConstituents,
	RandomAccessChainConstituents
};
pub use offsets::ChainOffsets;
pub use storage::ChainStorage;

/// 連結の添字。位置は有効な次元とその構成要素の添字を表す直和型
pub type ChainIndex<P> = CompositeIndex<P>;

/// 添字の型
type IndexOf<C> = ChainIndex<<C as ChainConstituents>::Position>;

/// 要素を直和型のまま返すことを表すマーカー
#[derive(Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Debug,Default)]
pub struct Tagged;

/// 要素を直和型から統合して返すことを表すマーカー
#[derive(Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Debug,Default)]
pub struct Merged;

/// 要素を直和型 `SumN` で返す連結
pub type SumChain<C> = ChainCollection<C,Tagged>;

/// 全ての構成要素の要素の型が同じ場合に、その型の要素を返す連結
pub type Chain<C> = ChainCollection<C,Merged>;



/// * 複数の構成要素を連結したコレクション。要素の返し方をマーカー `M` で区別する
/// * 値を複製してもストレージは共有され、構成要素を書き換えるときに共有されていれば複製する
pub struct ChainCollection<C: ChainConstituents,M> {
	storage: SharedStorage<ChainStorage<C>>,
	marker: PhantomData<M>
}

impl<C: ChainConstituents,M> ChainCollection<C,M> {

	/// 構成要素のタプルから連結を生成します
	pub fn new(constituents:C) -> Self {
		Self::from_shared(SharedStorage::new(constituents))
	}

	fn from_shared(storage:SharedStorage<ChainStorage<C>>) -> Self {
		Self { storage, marker: PhantomData }
	}

	/// 構成要素のタプルを参照します
	pub fn constituents(&self) -> &C {
		self.storage.get().constituents()
	}

	/// `K` 番目の構成要素を参照します
	pub fn constituent<const K:usize>(&self) -> &<C as Slot<K>>::Item
	where C: Slot<K> {
		<C as Slot<K>>::slot(self.constituents())
	}

	/// 位置の演算を行うストレージを参照します
	pub fn storage(&self) -> &ChainStorage<C> {
		self.storage.get()
	}

	/// 要素の総数 (各構成要素の要素数の和)
	pub fn len(&self) -> usize {
		self.storage.get().total_count()
	}

	/// 空かどうか。全ての構成要素が空であれば空になる
	pub fn is_empty(&self) -> bool {
		self.storage.get().is_empty()
	}

	/// 最初の要素の添字。空であれば終端
	pub fn start_index(&self) -> IndexOf<C> {
		self.storage.get().start_index().clone()
	}

	/// 終端の添字
	pub fn end_index(&self) -> IndexOf<C> {
		ChainIndex::End
	}

	/// 次の添字。最後の要素の次は終端になる
	#[track_caller]
	pub fn index_after(&self,index:&IndexOf<C>) -> IndexOf<C> {
		match index {
			ChainIndex::Position(p) => self.storage.get().position_after(p).into(),
			ChainIndex::End => contract_violation!("index_after","終端を越えて進めることはできません")
		}
	}

	/// 添字が指す要素を、直和型のまま返します
	#[track_caller]
	pub fn tagged_at(&self,index:&IndexOf<C>) -> C::Element<'_> {
		match index {
			ChainIndex::Position(p) => self.storage.get().element_at(p),
			ChainIndex::End => contract_violation!("at","終端の添字は要素を指しません")
		}
	}

	/// 通し番号で要素を直和型のまま取得します。範囲外であれば `None`
	pub fn tagged_get(&self,offset:usize) -> Option<C::Element<'_>> {
		(offset<self.len()).then(|| {
			let storage = self.storage.get();
			storage.element_at(&storage.position_for(offset))
		})
	}

	/// 添字の通し番号。終端の通し番号は要素数に等しい
	pub fn offset_of(&self,index:&IndexOf<C>) -> usize {
		match index {
			ChainIndex::Position(p) => self.storage.get().linearize(p),
			ChainIndex::End => self.len()
		}
	}

	/// 通し番号に対応する添字。要素数に等しければ終端になる
	#[track_caller]
	pub fn index_at(&self,offset:usize) -> IndexOf<C> {
		let len = self.len();
		match offset.cmp(&len) {
			Ordering::Less => ChainIndex::Position(self.storage.get().position_for(offset)),
			Ordering::Equal => ChainIndex::End,
			Ordering::Greater => contract_violation!("index_at","通し番号 {} は [0, {}] の範囲外です",offset,len)
		}
	}

	/// 添字を `distance` だけ進めた (負であれば戻した) 添字を返します
	#[track_caller]
	pub fn index_offset_by(&self,index:&IndexOf<C>,distance:isize) -> IndexOf<C> {
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

	/// `from` から `to` までの距離 (`to` が前にあれば負)
	pub fn distance(&self,from:&IndexOf<C>,to:&IndexOf<C>) -> isize {
		let (from,to) = (self.offset_of(from),self.offset_of(to));
		let magnitude = |d:usize| isize::try_from(d)
		.unwrap_or_else(|_| contract_violation!("distance","距離 {} が isize に収まりません",d) );
		if to>=from { magnitude(to-from) } else { -magnitude(from-to) }
	}

	/// 要素を順に返すイテレータ
	pub fn iter(&self) -> Iter<'_,C,M> {
		let storage = self.storage.get();
		Iter {
			storage,
			front: storage.start_index().position().cloned(),
			back: ChainIndex::End,
			remaining: storage.total_count(),
			marker: PhantomData
		}
	}

	/// 2つの値が同じストレージを共有しているかどうか
	pub fn shares_storage_with(&self,other:&Self) -> bool {
		self.storage.ptr_eq(&other.storage)
	}

	/// * 構成要素を書き換えます。全てのキャッシュは破棄される
	/// * ストレージが他の値と共有されていれば、書き換える前に複製する
	pub fn modify<R>(&mut self,f:impl FnOnce(&mut C)->R) -> R
	where C: Clone {
		self.storage.modify(f)
	}

	/// * `K` 番目の構成要素を置き換えます
	/// * ストレージが共有されていれば他の構成要素だけを複製し、置き換えられる構成要素は複製しない
	pub fn set_constituent<const K:usize>(&mut self,value:<C as Slot<K>>::Item)
	where C: WithSlot<K> {
		self.storage.set_slot::<K>(value)
	}

	/// `K` 番目の構成要素だけを置き換えた連結を返します
	pub fn with_constituent<const K:usize>(&self,value:<C as Slot<K>>::Item) -> Self
	where C: WithSlot<K> {
		Self::from_shared(self.storage.with_slot::<K>(value))
	}

	/// 構成要素のタプルに分解します
	pub fn into_constituents(self) -> C
	where C: Clone {
		self.storage.into_constituents()
	}

	/// 要素の返し方を切り替えます。ストレージは共有される
	pub fn into_presentation<N>(self) -> ChainCollection<C,N> {
		ChainCollection::from_shared(self.storage)
	}

}

impl<C: BidirectionalChainConstituents,M> ChainCollection<C,M> {

	/// 前の添字。終端の前は最後の要素の添字になる
	#[track_caller]
	pub fn index_before(&self,index:&IndexOf<C>) -> IndexOf<C> {
		let storage = self.storage.get();
		if index==storage.start_index() {
			contract_violation!("index_before","最初の添字より前に戻ることはできません");
		}
		match index {
			ChainIndex::Position(p) => storage.position_before(p).into(),
			ChainIndex::End => match storage.final_position() {
				Some(p) => ChainIndex::Position(p.clone()),
				None => contract_violation!("index_before","空の連結で終端から戻ることはできません")
			}
		}
	}

}

impl<C: ChainConstituents> SumChain<C> {

	/// 添字が指す要素
	#[track_caller]
	pub fn at(&self,index:&IndexOf<C>) -> C::Element<'_> {
		self.tagged_at(index)
	}

	/// 通し番号で要素を取得します。範囲外であれば `None`
	pub fn get(&self,offset:usize) -> Option<C::Element<'_>> {
		self.tagged_get(offset)
	}

}

impl<C: ChainConstituents> Chain<C> {

	/// 添字が指す要素
	#[track_caller]
	pub fn at<'a>(&'a self,index:&IndexOf<C>) -> <C::Element<'a> as Merge>::Output
	where C::Element<'a>: Merge {
		self.tagged_at(index).merge()
	}

	/// 通し番号で要素を取得します。範囲外であれば `None`
	pub fn get<'a>(&'a self,offset:usize) -> Option<<C::Element<'a> as Merge>::Output>
	where C::Element<'a>: Merge {
		self.tagged_get(offset).map(Merge::merge)
	}

}



impl<C: ChainConstituents,M> Clone for ChainCollection<C,M> {
	/// ストレージを共有した値を返します
	fn clone(&self) -> Self {
		Self::from_shared(self.storage.clone())
	}
}

impl<C: ChainConstituents,M> From<C> for ChainCollection<C,M> {
	fn from(constituents:C) -> Self { Self::new(constituents) }
}

impl<C,M> PartialEq for ChainCollection<C,M> where C: ChainConstituents + PartialEq {
	fn eq(&self,other:&Self) -> bool {
		self.constituents()==other.constituents()
	}
}

impl<C,M> Eq for ChainCollection<C,M> where C: ChainConstituents + Eq {}

impl<C,M> PartialOrd for ChainCollection<C,M> where C: ChainConstituents + PartialOrd {
	fn partial_cmp(&self,other:&Self) -> Option<Ordering> {
		self.constituents().partial_cmp(other.constituents())
	}
}

impl<C,M> Ord for ChainCollection<C,M> where C: ChainConstituents + Ord {
	fn cmp(&self,other:&Self) -> Ordering {
		self.constituents().cmp(other.constituents())
	}
}

impl<C,M> Hash for ChainCollection<C,M> where C: ChainConstituents + Hash {
	fn hash<H: Hasher>(&self,state:&mut H) {
		self.constituents().hash(state);
	}
}

impl<C,M> Debug for ChainCollection<C,M> where C: ChainConstituents + Debug, M: Debug + Default {
	fn fmt(&self,f:&mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ChainCollection")
		.field("presentation",&M::default())
		.field("constituents",self.constituents())
		.finish()
	}
}

#[cfg(feature="serde")]
mod serialization {
	use super::*;
	use serde::{ Serialize, Serializer, Deserialize, Deserializer };

	impl<C,M> Serialize for ChainCollection<C,M> where C: ChainConstituents + Serialize {
		fn serialize<S: Serializer>(&self,serializer:S) -> Result<S::Ok,S::Error> {
			self.constituents().serialize(serializer)
		}
	}

	impl<'de,C,M> Deserialize<'de> for ChainCollection<C,M> where C: ChainConstituents + Deserialize<'de> {
		fn deserialize<D: Deserializer<'de>>(deserializer:D) -> Result<Self,D::Error> {
			C::deserialize(deserializer).map(Self::new)
		}
	}
}



/// 連結の要素を順に返すイテレータ
pub struct Iter<'a,C: ChainConstituents,M> {
	storage: &'a ChainStorage<C>,
	front: Option<C::Position>,
	back: IndexOf<C>,
	remaining: usize,
	marker: PhantomData<M>
}

impl<'a,C: ChainConstituents,M> Iter<'a,C,M> {

	fn next_tagged(&mut self) -> Option<C::Element<'a>> {
		if self.remaining==0 { return None; }
		let position = self.front.take()?;
		self.remaining -= 1;
		if self.remaining>0 {
			self.front = self.storage.position_after(&position);
		}
		Some(self.storage.element_at(&position))
	}

}

impl<'a,C: BidirectionalChainConstituents,M> Iter<'a,C,M> {

	fn next_back_tagged(&mut self) -> Option<C::Element<'a>> {
		if self.remaining==0 { return None; }
		let position = match &self.back {
			ChainIndex::Position(p) => self.storage.position_before(p),
			ChainIndex::End => self.storage.final_position().cloned()
		}?;
		self.remaining -= 1;
		self.back = ChainIndex::Position(position);
		self.back.position().map(|p| self.storage.element_at(p) )
	}

}

impl<'a,C: ChainConstituents> Iterator for Iter<'a,C,Tagged> {
	type Item = C::Element<'a>;

	fn next(&mut self) -> Option<Self::Item> { self.next_tagged() }

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining,Some(self.remaining))
	}
}

impl<'a,C: ChainConstituents> Iterator for Iter<'a,C,Merged>
where C::Element<'a>: Merge {
	type Item = <C::Element<'a> as Merge>::Output;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_tagged().map(Merge::merge)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining,Some(self.remaining))
	}
}

impl<'a,C: BidirectionalChainConstituents> DoubleEndedIterator for Iter<'a,C,Tagged> {
	fn next_back(&mut self) -> Option<Self::Item> { self.next_back_tagged() }
}

impl<'a,C: BidirectionalChainConstituents> DoubleEndedIterator for Iter<'a,C,Merged>
where C::Element<'a>: Merge {
	fn next_back(&mut self) -> Option<Self::Item> {
		self.next_back_tagged().map(Merge::merge)
	}
}

impl<'a,C: ChainConstituents,M> ExactSizeIterator for Iter<'a,C,M> where Self: Iterator {}

impl<'a,C: ChainConstituents,M> FusedIterator for Iter<'a,C,M> where Self: Iterator {}

impl<'a,C: ChainConstituents,M> IntoIterator for &'a ChainCollection<C,M>
where Iter<'a,C,M>: Iterator {
	type Item = <Iter<'a,C,M> as Iterator>::Item;
	type IntoIter = Iter<'a,C,M>;
	fn into_iter(self) -> Iter<'a,C,M> { self.iter() }
}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::{
		Chain,
		SumChain,
		ChainCollection,
		ChainIndex,
		ChainConstituents,
		BidirectionalChainConstituents,
		RandomAccessChainConstituents
	};
}



#[cfg(test)]
mod tests {
	use super::*;

	fn numbers() -> Chain<(Vec<i32>,Vec<i32>,[i32;2])> {
		Chain::new( (vec![1,2],vec![],[3,4]) )
	}

	#[test]
	fn chain_walks_constituents_in_order() {
		let c = numbers();
		assert_eq!(c.len(),4);
		let mut seen = vec![];
		let mut i = c.start_index();
		while !i.is_end() {
			seen.push(*c.at(&i));
			i = c.index_after(&i);
		}
		assert_eq!(seen,[1,2,3,4]);
		assert_eq!(c.iter().rev().copied().collect::<Vec<_>>(),[4,3,2,1]);
		assert_eq!(c.get(2),Some(&3));
		assert_eq!(c.get(4),None);
	}

	#[test]
	fn positions_carry_the_active_dimension() {
		let c = numbers();
		assert_eq!(c.index_at(2),ChainIndex::Position(Sum3::V2(0)));
		assert_eq!(c.offset_of(&ChainIndex::Position(Sum3::V0(1))),1);
		assert_eq!(c.index_before(&ChainIndex::Position(Sum3::V2(0))),ChainIndex::Position(Sum3::V0(1)));
		assert_eq!(c.index_before(&c.end_index()),ChainIndex::Position(Sum3::V2(1)));
		assert!(ChainIndex::Position(Sum3::V0(1))<c.index_at(2));
	}

	#[test]
	fn sum_chain_keeps_heterogeneous_elements_apart() {
		let s = SumChain::new( (vec![10_u8],vec!["ten"],['x']) );
		assert_eq!(
			s.iter().collect::<Vec<_>>(),
			[Sum3::V0(&10),Sum3::V1(&"ten"),Sum3::V2(&'x')]
		);
		assert_eq!(s.get(1).map(|e| e.variant() ),Some(1));
	}

	#[cfg(feature="ranges")]
	#[test]
	fn ranges_and_containers_in_one_chain() {
		let s = SumChain::new( (0_u32..2,vec![5_u32]) );
		let merged = s.iter().map(|e| match e {
			Sum2::V0(n) => n,
			Sum2::V1(&n) => n
		}).collect::<Vec<_>>();
		assert_eq!(merged,[0,1,5]);
	}

	#[test]
	fn all_empty_constituents_make_an_empty_chain() {
		let c = Chain::new( (Vec::<u8>::new(),Vec::<u8>::new()) );
		assert!(c.is_empty());
		assert_eq!(c.start_index(),c.end_index());
		assert_eq!(c.iter().next(),None);
	}

	#[test]
	fn offset_by_and_distance() {
		let c = numbers();
		let start = c.start_index();
		let i = c.index_offset_by(&start,3);
		assert_eq!(*c.at(&i),4);
		assert_eq!(c.index_offset_by(&i,-2),ChainIndex::Position(Sum3::V0(1)));
		assert_eq!(c.distance(&i,&start),-3);
		assert_eq!(c.index_offset_by(&i,1),c.end_index());
	}

	#[test]
	#[should_panic(expected="[契約違反] index_after")]
	fn advancing_past_end_faults() {
		let c = numbers();
		c.index_after(&c.end_index());
	}

	#[test]
	#[should_panic(expected="[契約違反] index_before")]
	fn retreating_past_start_faults() {
		let c = numbers();
		c.index_before(&c.start_index());
	}

	#[test]
	#[should_panic(expected="[契約違反] at")]
	fn subscripting_end_faults() {
		let c = numbers();
		c.at(&c.end_index());
	}

	#[test]
	#[should_panic(expected="[契約違反] index_offset_by")]
	fn offset_outside_range_faults() {
		let c = numbers();
		c.index_offset_by(&c.start_index(),-1);
	}

	#[test]
	fn copy_on_write_isolates_values() {
		let a = numbers();
		let mut b = a.clone();
		assert!(a.shares_storage_with(&b));
		b.set_constituent::<1>(vec![9,9]);
		assert!(!a.shares_storage_with(&b));
		assert_eq!(a.iter().copied().collect::<Vec<_>>(),[1,2,3,4]);
		assert_eq!(b.iter().copied().collect::<Vec<_>>(),[1,2,9,9,3,4]);

		let c = b.with_constituent::<0>(vec![]);
		assert_eq!(c.len(),4);
		assert_eq!(c.start_index(),ChainIndex::Position(Sum3::V1(0)));
		assert_eq!(b.len(),6);
	}

	#[test]
	fn presentation_can_be_switched() {
		let c = numbers();
		let s = c.clone().into_presentation::<Tagged>();
		assert_eq!(s.at(&s.start_index()),Sum3::V0(&1));
		assert_eq!(s.constituents(),c.constituents());
		assert_eq!(s.into_constituents(),(vec![1,2],vec![],[3,4]));
	}

	#[test]
	fn equality_is_structural() {
		let a = numbers();
		let b = numbers();
		assert_eq!(a,b);
		let mut c = b.clone();
		c.modify(|(first,_,_)| first.pop() );
		assert_ne!(a,c);
		assert!(c<a);
	}

	#[cfg(feature="serde")]
	#[test]
	fn serializes_as_constituent_tuple() {
		let c = numbers();
		let json = serde_json::to_string(&c).expect("直列化できません");
		assert_eq!(json,"[[1,2],[],[3,4]]");
		let d:Chain<(Vec<i32>,Vec<i32>,[i32;2])> = serde_json::from_str(&json).expect("復元できません");
		assert_eq!(c,d);
	}
}
