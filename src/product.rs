//! 複数のコレクションの直積 (カーテジアン積) を、要素を複製せずに1つのコレクションとして扱うモジュール
//!
//! * 要素は各構成要素の要素のタプルで、並び順は次元 0 を最上位とする辞書式の順序になる
//! * 位置は各次元の添字のタプルで、次の位置はオドメータのように末尾の次元から繰り上げて求める
//! * 位置と通し番号は混合基数のストライド表で相互に変換され、ランダムアクセスが可能になる
//!
//! ```rust
//! use composites::prelude::*;
//!
//! let p = Product::new( (vec![0,1],vec!['x','y','z']) );
//! assert_eq!(p.len(),6);
//! let items = p.iter().map(|(n,c)| format!("{n}{c}") ).collect::<Vec<_>>();
//! assert_eq!(items,["0x","0y","0z","1x","1y","1z"]);
//! ```

use super::*;
use crate::cow::{ CompositeStorage, SharedStorage };

use std::{
	cmp::Ordering,
	fmt::{ self, Debug },
	hash::{ Hash, Hasher },
	iter::FusedIterator
};
#[cfg(feature="parallel")]
use rayon::iter::{
	IntoParallelIterator,
	ParallelIterator,
	IndexedParallelIterator
};

pub mod constituents;
pub mod stride;
mod storage;

pub use constituents::{
	ProductConstituents,
	BidirectionalProductConstituents,
	RandomAccessProductConstituents
};
pub use stride::{ StrideTable, Distances, MAX_ARITY };
pub use storage::ProductStorage;

/// 直積の添字。位置は各次元の添字のタプル
pub type ProductIndex<P> = CompositeIndex<P>;

/// 添字の型
type IndexOf<C> = ProductIndex<<C as ProductConstituents>::Position>;



/// * 複数の構成要素の直積を表すコレクション
/// * 値を複製してもストレージは共有され、構成要素を書き換えるときに共有されていれば複製する
pub struct Product<C: ProductConstituents> {
	storage: SharedStorage<ProductStorage<C>>
}

impl<C: ProductConstituents> Product<C> {

	/// 構成要素のタプルから直積を生成します
	pub fn new(constituents:C) -> Self {
		Self { storage: SharedStorage::new(constituents) }
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
	pub fn storage(&self) -> &ProductStorage<C> {
		self.storage.get()
	}

	/// 要素の総数 (各構成要素の要素数の積)
	pub fn len(&self) -> usize {
		self.storage.get().total_count()
	}

	/// 空かどうか。いずれかの構成要素が空であれば空になる
	pub fn is_empty(&self) -> bool {
		self.storage.get().is_empty()
	}

	/// 最初の要素の添字。空であれば終端
	pub fn start_index(&self) -> IndexOf<C> {
		self.storage.get().start_index().clone()
	}

	/// 終端の添字
	pub fn end_index(&self) -> IndexOf<C> {
		ProductIndex::End
	}

	/// 次の添字。最後の要素の次は終端になる
	#[track_caller]
	pub fn index_after(&self,index:&IndexOf<C>) -> IndexOf<C> {
		match index {
			ProductIndex::Position(p) => self.storage.get().position_after(p).into(),
			ProductIndex::End => contract_violation!("index_after","終端を越えて進めることはできません")
		}
	}

	/// 添字が指す要素
	#[track_caller]
	pub fn at(&self,index:&IndexOf<C>) -> C::Element<'_> {
		match index {
			ProductIndex::Position(p) => self.storage.get().element_at(p),
			ProductIndex::End => contract_violation!("at","終端の添字は要素を指しません")
		}
	}

	/// 通し番号で要素を取得します。範囲外であれば `None`
	pub fn get(&self,offset:usize) -> Option<C::Element<'_>> {
		(offset<self.len()).then(|| {
			let storage = self.storage.get();
			storage.element_at(&storage.position_for(offset))
		})
	}

	/// 最初の要素
	pub fn first(&self) -> Option<C::Element<'_>> {
		let storage = self.storage.get();
		storage.start_index().position().map(|p| storage.element_at(p) )
	}

	/// 添字の通し番号。終端の通し番号は要素数に等しい
	pub fn offset_of(&self,index:&IndexOf<C>) -> usize {
		match index {
			ProductIndex::Position(p) => self.storage.get().linearize(p),
			ProductIndex::End => self.len()
		}
	}

	/// 通し番号に対応する添字。要素数に等しければ終端になる
	#[track_caller]
	pub fn index_at(&self,offset:usize) -> IndexOf<C> {
		let len = self.len();
		match offset.cmp(&len) {
			Ordering::Less => ProductIndex::Position(self.storage.get().position_for(offset)),
			Ordering::Equal => ProductIndex::End,
			Ordering::Greater => contract_violation!("index_at","通し番号 {} は [0, {}] の範囲外です",offset,len)
		}
	}

	/// * 添字を `distance` だけ進めた (負であれば戻した) 添字を返します
	/// * 通し番号を経由するので、構成要素がランダムアクセス可能であれば距離に依らず O(1) で求まる
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
		signed_distance(self.offset_of(from),self.offset_of(to))
	}

	/// 要素を順に返すイテレータ
	pub fn iter(&self) -> Iter<'_,C> {
		let storage = self.storage.get();
		Iter {
			storage,
			front: storage.start_index().position().cloned(),
			back: ProductIndex::End,
			remaining: storage.total_count()
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

	/// `K` 番目の構成要素だけを置き換えた直積を返します
	pub fn with_constituent<const K:usize>(&self,value:<C as Slot<K>>::Item) -> Self
	where C: WithSlot<K> {
		Self { storage: self.storage.with_slot::<K>(value) }
	}

	/// 構成要素のタプルに分解します
	pub fn into_constituents(self) -> C
	where C: Clone {
		self.storage.into_constituents()
	}

}

impl<C: BidirectionalProductConstituents> Product<C> {

	/// 前の添字。終端の前は最後の要素の添字になる
	#[track_caller]
	pub fn index_before(&self,index:&IndexOf<C>) -> IndexOf<C> {
		let storage = self.storage.get();
		if index==storage.start_index() {
			contract_violation!("index_before","最初の添字より前に戻ることはできません");
		}
		match index {
			ProductIndex::Position(p) => storage.position_before(p).into(),
			ProductIndex::End => match storage.final_position() {
				Some(p) => ProductIndex::Position(p.clone()),
				None => contract_violation!("index_before","空の直積で終端から戻ることはできません")
			}
		}
	}

	/// 最後の要素
	pub fn last(&self) -> Option<C::Element<'_>> {
		let storage = self.storage.get();
		storage.final_position().map(|p| storage.element_at(p) )
	}

}

#[cfg(feature="parallel")]
impl<C: ProductConstituents> Product<C> {

	/// 要素を並列に返すイテレータ。各要素の位置は通し番号から独立に求める
	pub fn par_iter<'a>(&'a self) -> impl IndexedParallelIterator<Item=C::Element<'a>> + 'a
	where
		C: Sync,
		C::Position: Send + Sync,
		C::Element<'a>: Send
	{
		let storage = self.storage.get();
		(0..storage.total_count())
		.into_par_iter()
		.map(move |offset| storage.element_at(&storage.position_for(offset)) )
	}

}

/// 2つの通し番号の差を符号付きで求める
fn signed_distance(from:usize,to:usize) -> isize {
	let magnitude = |d:usize| isize::try_from(d)
	.unwrap_or_else(|_| contract_violation!("distance","距離 {} が isize に収まりません",d) );
	if to>=from { magnitude(to-from) } else { -magnitude(from-to) }
}



impl<C: ProductConstituents> Clone for Product<C> {
	/// ストレージを共有した値を返します
	fn clone(&self) -> Self {
		Self { storage: self.storage.clone() }
	}
}

impl<C: ProductConstituents> From<C> for Product<C> {
	fn from(constituents:C) -> Self { Self::new(constituents) }
}

impl<C> PartialEq for Product<C> where C: ProductConstituents + PartialEq {
	fn eq(&self,other:&Self) -> bool {
		self.constituents()==other.constituents()
	}
}

impl<C> Eq for Product<C> where C: ProductConstituents + Eq {}

impl<C> PartialOrd for Product<C> where C: ProductConstituents + PartialOrd {
	fn partial_cmp(&self,other:&Self) -> Option<Ordering> {
		self.constituents().partial_cmp(other.constituents())
	}
}

impl<C> Ord for Product<C> where C: ProductConstituents + Ord {
	fn cmp(&self,other:&Self) -> Ordering {
		self.constituents().cmp(other.constituents())
	}
}

impl<C> Hash for Product<C> where C: ProductConstituents + Hash {
	fn hash<H: Hasher>(&self,state:&mut H) {
		self.constituents().hash(state);
	}
}

impl<C> Debug for Product<C> where C: ProductConstituents + Debug {
	fn fmt(&self,f:&mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Product")
		.field("constituents",self.constituents())
		.finish()
	}
}

#[cfg(feature="serde")]
mod serialization {
	use super::*;
	use serde::{ Serialize, Serializer, Deserialize, Deserializer };

	/// 構成要素のタプルとして直列化する
	impl<C> Serialize for Product<C> where C: ProductConstituents + Serialize {
		fn serialize<S: Serializer>(&self,serializer:S) -> Result<S::Ok,S::Error> {
			self.constituents().serialize(serializer)
		}
	}

	/// 構成要素のタプルから、キャッシュが空のストレージを作り直す
	impl<'de,C> Deserialize<'de> for Product<C> where C: ProductConstituents + Deserialize<'de> {
		fn deserialize<D: Deserializer<'de>>(deserializer:D) -> Result<Self,D::Error> {
			C::deserialize(deserializer).map(Self::new)
		}
	}
}



/// 直積の要素を順に返すイテレータ
pub struct Iter<'a,C: ProductConstituents> {
	storage: &'a ProductStorage<C>,
	front: Option<C::Position>,
	back: IndexOf<C>,
	remaining: usize
}

impl<'a,C: ProductConstituents> Iterator for Iter<'a,C> {
	type Item = C::Element<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.remaining==0 { return None; }
		let position = self.front.take()?;
		self.remaining -= 1;
		if self.remaining>0 {
			self.front = self.storage.position_after(&position);
		}
		Some(self.storage.element_at(&position))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining,Some(self.remaining))
	}
}

impl<'a,C: BidirectionalProductConstituents> DoubleEndedIterator for Iter<'a,C> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.remaining==0 { return None; }
		let position = match &self.back {
			ProductIndex::Position(p) => self.storage.position_before(p),
			ProductIndex::End => self.storage.final_position().cloned()
		}?;
		self.remaining -= 1;
		self.back = ProductIndex::Position(position);
		self.back.position().map(|p| self.storage.element_at(p) )
	}
}

impl<'a,C: ProductConstituents> ExactSizeIterator for Iter<'a,C> {}

impl<'a,C: ProductConstituents> FusedIterator for Iter<'a,C> {}

impl<'a,C: ProductConstituents> IntoIterator for &'a Product<C> {
	type Item = C::Element<'a>;
	type IntoIter = Iter<'a,C>;
	fn into_iter(self) -> Iter<'a,C> { self.iter() }
}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::{
		Product,
		ProductIndex,
		ProductConstituents,
		BidirectionalProductConstituents,
		RandomAccessProductConstituents
	};
}
