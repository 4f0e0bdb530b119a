//! 合成コレクションを構成する個々のコレクション (構成要素) が満たすべき性質を定めるモジュール

use super::*;

use std::{
	collections::VecDeque,
	fmt::Debug,
	hash::Hash
};

/// 合成コレクションの1つの次元になることができる、順序付きで有限なコレクション
/// * 添字 `Index` は開始位置 `start_bound` から終端 `end_bound` の手前まで、 `index_after` で順に辿れる
/// * 終端 `end_bound` は要素を指さない (添字としては参照できない)
pub trait Constituent {
	/// 要素の位置を表す添字
	type Index: Clone + Eq + Ord + Hash + Debug;
	/// 添字で参照した要素。コンテナであれば参照、数の範囲であれば値そのものになる
	type Element<'a> where Self: 'a;

	/// 要素数
	fn count(&self) -> usize;
	/// 要素が1つもないかどうか
	fn is_empty(&self) -> bool { self.count()==0 }
	/// 最初の要素の添字 (空であれば `end_bound` と等しい)
	fn start_bound(&self) -> Self::Index;
	/// 最後の要素の次を表す添字
	fn end_bound(&self) -> Self::Index;
	/// 添字が指す要素を返します。添字は参照可能でなければならない
	fn element_at<'a>(&'a self,index:&Self::Index) -> Self::Element<'a>;
	/// 次の要素の添字を返します。 `index` が最後の要素を指していれば `None` になる
	fn index_after(&self,index:&Self::Index) -> Option<Self::Index>;

	/// * `from` から `to` までの距離を返します (`from` が `to` より前になければならない)
	/// * 既定の実装は `index_after` を順に辿るので O(距離) かかる
	fn distance(&self,from:&Self::Index,to:&Self::Index) -> usize {
		let end = self.end_bound();
		let mut cursor = from.clone();
		let mut distance = 0_usize;
		while cursor != *to {
			if cursor==end {
				contract_violation!("distance","{:?} から {:?} に到達できません",from,to);
			}
			cursor = self.index_after(&cursor).unwrap_or_else(|| end.clone() );
			distance += 1;
		}
		distance
	}

	/// * `index` から `distance` 個だけ進めた添字を返します。終端ちょうどまでは進めることができる
	/// * 既定の実装は `index_after` を順に辿るので O(距離) かかる
	fn index_offset_by(&self,index:&Self::Index,distance:usize) -> Self::Index {
		let end = self.end_bound();
		let mut cursor = index.clone();
		for step in 0..distance {
			if cursor==end {
				contract_violation!(
					"index_offset_by",
					"{:?} から {} 個進めようとしましたが、 {} 個目で終端を越えます",
					index,distance,step+1
				);
			}
			cursor = self.index_after(&cursor).unwrap_or_else(|| end.clone() );
		}
		cursor
	}
}

/// 逆向きにも辿ることができる構成要素
pub trait BidirectionalConstituent: Constituent {
	/// 前の要素の添字を返します。 `index` が最初の要素を指していれば `None` になる
	/// * `index` に `end_bound` を与えた場合は最後の要素の添字が返る
	fn index_before(&self,index:&Self::Index) -> Option<Self::Index>;

	/// 最後の要素の添字を返します。空であれば `None`
	fn final_index(&self) -> Option<Self::Index> {
		if self.is_empty() { return None; }
		self.index_before(&self.end_bound())
	}
}

/// * `distance` と `index_offset_by` を O(1) で計算できる構成要素であることを示すマーカートレイト
/// * 合成コレクションのランダムアクセスが、距離の大きさに関係なく O(1) で行えるようになる
pub trait RandomAccessConstituent: BidirectionalConstituent {}



/// * 長さと `usize` の添字による参照を持つコンテナに対して構成要素のトレイトを実装するマクロ
/// * `implement!( [ジェネリクス] 型, ... )` のように指定する
macro_rules! implement {
	( $( [ $( $g:tt )* ] $ty:ty ),+ $(,)? ) => { $(

		impl<$($g)*> Constituent for $ty {
			type Index = usize;
			type Element<'a> = &'a T where Self: 'a;

			#[inline]
			fn count(&self) -> usize { self.len() }
			#[inline]
			fn start_bound(&self) -> usize { 0 }
			#[inline]
			fn end_bound(&self) -> usize { self.len() }
			#[inline]
			fn element_at<'a>(&'a self,index:&usize) -> &'a T { &self[*index] }
			#[inline]
			fn index_after(&self,index:&usize) -> Option<usize> {
				let next = *index+1;
				(next<self.len()).then_some(next)
			}
			#[inline]
			fn distance(&self,from:&usize,to:&usize) -> usize {
				to.checked_sub(*from)
				.unwrap_or_else(|| contract_violation!("distance","{} は {} より前にあります",to,from) )
			}
			#[inline]
			fn index_offset_by(&self,index:&usize,distance:usize) -> usize {
				let destination = *index+distance;
				if destination>self.len() {
					contract_violation!(
						"index_offset_by",
						"{} から {} 個進めると終端 {} を越えます",
						index,distance,self.len()
					);
				}
				destination
			}
		}

		impl<$($g)*> BidirectionalConstituent for $ty {
			#[inline]
			fn index_before(&self,index:&usize) -> Option<usize> {
				index.checked_sub(1)
			}
		}

		impl<$($g)*> RandomAccessConstituent for $ty {}

	)+ };
}

implement!(
	[T] Vec<T>,
	[T] Box<[T]>,
	[T] VecDeque<T>,
	[T,const N:usize] [T;N],
	['s,T] &'s [T],
);



#[cfg(feature="ranges")]
/// 整数の範囲を、値そのものを要素とする構成要素として扱うモジュール
mod integer_range {
	use super::*;
	use num::{ PrimInt, NumCast };
	use std::ops::Range;

	/// * `from` から `to` までの幅
	/// * 差が `T` に収まらない場合 (符号付きの型で幅が `T::MAX` を越える場合) は `i128` で計算する
	fn span<T:PrimInt>(from:T,to:T) -> Option<usize> {
		match to.checked_sub(&from) {
			Some(d) => d.to_usize(),
			None => usize::try_from(to.to_i128()?.checked_sub(from.to_i128()?)?).ok()
		}
	}

	/// `from` から `distance` 個進めた値。 `distance` が `T` に収まらなければ `i128` で計算する
	fn advance<T:PrimInt>(from:T,distance:usize) -> Option<T> {
		match <T as NumCast>::from(distance) {
			Some(d) => from.checked_add(&d),
			None => <T as NumCast>::from(from.to_i128()?.checked_add(i128::try_from(distance).ok()?)?)
		}
	}

	impl<T> Constituent for Range<T> where T: PrimInt + Hash + Debug {
		type Index = T;
		type Element<'a> = T where Self: 'a;

		fn count(&self) -> usize {
			if self.end<=self.start { return 0; }
			span(self.start,self.end)
			.unwrap_or_else(|| contract_violation!("count","範囲 {:?} の要素数が usize に収まりません",self) )
		}
		fn is_empty(&self) -> bool { self.end<=self.start }
		fn start_bound(&self) -> T { self.start }
		fn end_bound(&self) -> T { self.end.max(self.start) }
		fn element_at<'a>(&'a self,index:&T) -> T { *index }
		fn index_after(&self,index:&T) -> Option<T> {
			let next = *index+T::one();
			(next<self.end).then_some(next)
		}
		fn distance(&self,from:&T,to:&T) -> usize {
			if to<from {
				contract_violation!("distance","{:?} は {:?} より前にあります",to,from);
			}
			span(*from,*to)
			.unwrap_or_else(|| contract_violation!("distance","{:?} から {:?} までの距離が usize に収まりません",from,to) )
		}
		fn index_offset_by(&self,index:&T,distance:usize) -> T {
			advance(*index,distance)
			.filter(|destination| *destination<=self.end_bound() )
			.unwrap_or_else(|| contract_violation!(
				"index_offset_by",
				"{:?} から {} 個進めると範囲 {:?} の終端を越えます",
				index,distance,self
			) )
		}
	}

	impl<T> BidirectionalConstituent for Range<T> where T: PrimInt + Hash + Debug {
		fn index_before(&self,index:&T) -> Option<T> {
			(*index>self.start).then(|| *index-T::one() )
		}
	}

	impl<T> RandomAccessConstituent for Range<T> where T: PrimInt + Hash + Debug {}

}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::{
		Constituent,
		BidirectionalConstituent,
		RandomAccessConstituent
	};
}



#[cfg(test)]
mod tests {
	use super::*;

	/// 前方にしか辿れない構成要素 (既定の `distance` / `index_offset_by` を使用する)
	struct Forward(Vec<char>);

	impl Constituent for Forward {
		type Index = usize;
		type Element<'a> = char;
		fn count(&self) -> usize { self.0.len() }
		fn start_bound(&self) -> usize { 0 }
		fn end_bound(&self) -> usize { self.0.len() }
		fn element_at<'a>(&'a self,index:&usize) -> char { self.0[*index] }
		fn index_after(&self,index:&usize) -> Option<usize> {
			(index+1<self.0.len()).then_some(index+1)
		}
	}

	#[test]
	fn walking_distance_reaches_end() {
		let f = Forward(vec!['a','b','c']);
		assert_eq!(f.distance(&0,&2),2);
		assert_eq!(f.distance(&1,&3),2);
		assert_eq!(f.index_offset_by(&0,3),3);
		assert_eq!(f.element_at(&f.index_offset_by(&0,1)),'b');
	}

	#[test]
	#[should_panic(expected="[契約違反] index_offset_by")]
	fn walking_offset_past_end_faults() {
		let f = Forward(vec!['a']);
		f.index_offset_by(&0,2);
	}

	#[test]
	fn slice_like_containers() {
		let v = vec![10,20,30];
		assert_eq!(v.index_after(&1),Some(2));
		assert_eq!(v.index_after(&2),None);
		assert_eq!(v.index_before(&0),None);
		assert_eq!(v.final_index(),Some(2));
		assert_eq!(*v.element_at(&1),20);

		let a = [1_u8;4];
		assert_eq!(Constituent::count(&a),4);
		let s:&[i32] = &[];
		assert!(Constituent::is_empty(&s));
		assert_eq!(s.final_index(),None);
	}

	#[cfg(feature="ranges")]
	#[test]
	fn integer_ranges() {
		let r = -2_i32..3;
		assert_eq!(Constituent::count(&r),5);
		assert_eq!(r.index_after(&2),None);
		assert_eq!(Constituent::count(&(-128_i8..127)),255);
		assert_eq!(r.index_before(&-2),None);
		assert_eq!(r.final_index(),Some(2));
		assert_eq!(r.distance(&-2,&3),5);
		assert_eq!(r.index_offset_by(&-1,2),1);
		let e = 5_u8..2;
		assert!(Constituent::is_empty(&e));
		assert_eq!(e.start_bound(),e.end_bound());
	}

	#[cfg(feature="ranges")]
	#[test]
	fn signed_ranges_wider_than_their_type() {
		let r = -128_i8..127;
		assert_eq!(r.index_offset_by(&-128,254),126);
		assert_eq!(r.index_offset_by(&-128,255),127);
		assert_eq!(r.distance(&-128,&127),255);
	}

	#[cfg(feature="ranges")]
	#[test]
	#[should_panic(expected="[契約違反] index_offset_by")]
	fn signed_range_offset_past_end_faults() {
		(-100_i8..100).index_offset_by(&-100,201);
	}

	#[cfg(feature="ranges")]
	#[test]
	fn unsigned_ranges_above_the_signed_maximum() {
		let top = u128::MAX-2;
		let r = top..u128::MAX;
		assert_eq!(Constituent::count(&r),2);
		assert_eq!(r.distance(&top,&u128::MAX),2);
		assert_eq!(r.index_offset_by(&top,1),top+1);
	}
}
