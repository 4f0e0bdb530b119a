//! 連結の構成要素のタプルに対して、有効な次元ごとの操作を振り分けるトレイトを与えるモジュール
//! * 位置は直和型 `SumN` で、どのバリアントであるかが現在の次元を表す
//! * 次の構成要素への移動や通し番号の計算は次元数に依らず、ストレージで一度だけ書かれている

use super::*;

/// 連結される構成要素のタプル `(C0,C1,...)`
pub trait ChainConstituents {
	/// 次元数
	const ARITY:usize;
	/// 現在の次元と、その構成要素の添字を表す直和型
	type Position: Clone + Eq + Ord + Hash + Debug + Variant;
	/// 現在の次元の要素を保持する直和型
	type Element<'a> where Self: 'a;

	/// 次元 `dimension` の要素数
	fn count_at(&self,dimension:usize) -> usize;
	/// 次元 `dimension` が空かどうか
	fn is_empty_at(&self,dimension:usize) -> bool;
	/// 次元 `dimension` の開始位置
	fn start_position_at(&self,dimension:usize) -> Self::Position;
	/// 位置が指す要素
	fn element_at<'a>(&'a self,position:&Self::Position) -> Self::Element<'a>;
	/// 現在の構成要素の中で1つ進めた位置。構成要素の最後の添字であれば `None`
	fn step_after(&self,position:&Self::Position) -> Option<Self::Position>;
	/// 現在の構成要素の開始位置から、位置までの距離
	fn distance_in(&self,position:&Self::Position) -> usize;
	/// 次元 `dimension` の開始位置から `distance` だけ進めた位置
	fn position_at_distance(&self,dimension:usize,distance:usize) -> Self::Position;
	/// 位置が参照可能な添字を指しているかどうか
	fn is_dereferenceable(&self,position:&Self::Position) -> bool;
}

/// 全ての構成要素を逆向きにも辿れる連結の構成要素
pub trait BidirectionalChainConstituents: ChainConstituents {
	/// 現在の構成要素の中で1つ戻した位置。構成要素の開始位置であれば `None`
	fn step_before(&self,position:&Self::Position) -> Option<Self::Position>;
	/// 次元 `dimension` の最後の添字の位置。空であれば `None`
	fn final_position_at(&self,dimension:usize) -> Option<Self::Position>;
}

/// 全ての構成要素がランダムアクセス可能な連結の構成要素
pub trait RandomAccessChainConstituents: BidirectionalChainConstituents {}



/// * 構成要素のタプルに対して `ChainConstituents` などを実装するマクロ
/// * `impl_chain_constituents!( names: Sum1 ... SumN; C0 V0 0 ... C(N-1) V(N-1) (N-1) )` と指定すれば、 `N` 個の要素まで対応する
/// * 直和型の名前は要素数の順に並べる
macro_rules! impl_chain_constituents {
	// マクロのエントリポイント: 全ての実装をモジュールで囲む
	( names: $( $name:ident )+ ; $( $c:ident $v:ident $n:tt )+ ) => {
		mod impl_chain_constituents {
			use crate::{
				constituent::*,
				tuples::sum::*,
				chain::constituents::*,
				product::constituents::dimension_out_of_range
			};

			$crate::chain::constituents::impl_chain_constituents! {@each [ $( $name )+ ] | $( $c $v $n )+ }
		}
	};
	(@each
		[ $name:ident $( $names:ident )* ]
		$( $c:ident $v:ident $n:tt )* |
		$cn:ident $vn:ident $nn:tt
		$( $others:tt )*
	) => {
		$crate::chain::constituents::impl_chain_constituents! {@one $name $( $c $v $n )* $cn $vn $nn }
		$crate::chain::constituents::impl_chain_constituents! {@each [ $( $names )* ] $( $c $v $n )* $cn $vn $nn | $( $others )* }
	};
	(@each [ $( $names:ident )* ] $( $c:ident $v:ident $n:tt )* | ) => {};
	// 要素数を固定した実装
	(@one $name:ident $( $c:ident $v:ident $n:tt )+ ) => {

		impl<$($c),+> ChainConstituents for ($($c,)+)
		where $( $c: Constituent ),+
		{
			const ARITY:usize = [ $( $n ),+ ].len();
			type Position = $name<$( $c::Index ),+>;
			type Element<'a> = $name<$( $c::Element<'a> ),+> where Self: 'a;

			fn count_at(&self,dimension:usize) -> usize {
				match dimension {
					$( $n => self.$n.count(), )+
					_ => dimension_out_of_range("count_at",dimension,Self::ARITY)
				}
			}

			fn is_empty_at(&self,dimension:usize) -> bool {
				match dimension {
					$( $n => self.$n.is_empty(), )+
					_ => dimension_out_of_range("is_empty_at",dimension,Self::ARITY)
				}
			}

			fn start_position_at(&self,dimension:usize) -> Self::Position {
				match dimension {
					$( $n => $name::$v(self.$n.start_bound()), )+
					_ => dimension_out_of_range("start_position_at",dimension,Self::ARITY)
				}
			}

			fn element_at<'a>(&'a self,position:&Self::Position) -> Self::Element<'a> {
				match position {
					$( $name::$v(i) => $name::$v(self.$n.element_at(i)), )+
				}
			}

			fn step_after(&self,position:&Self::Position) -> Option<Self::Position> {
				match position {
					$( $name::$v(i) => self.$n.index_after(i).map($name::$v), )+
				}
			}

			fn distance_in(&self,position:&Self::Position) -> usize {
				match position {
					$( $name::$v(i) => self.$n.distance(&self.$n.start_bound(),i), )+
				}
			}

			fn position_at_distance(&self,dimension:usize,distance:usize) -> Self::Position {
				match dimension {
					$( $n => $name::$v(self.$n.index_offset_by(&self.$n.start_bound(),distance)), )+
					_ => dimension_out_of_range("position_at_distance",dimension,Self::ARITY)
				}
			}

			fn is_dereferenceable(&self,position:&Self::Position) -> bool {
				match position {
					$( $name::$v(i) => self.$n.start_bound()<=*i && *i<self.$n.end_bound(), )+
				}
			}
		}

		impl<$($c),+> BidirectionalChainConstituents for ($($c,)+)
		where $( $c: BidirectionalConstituent ),+
		{
			fn step_before(&self,position:&Self::Position) -> Option<Self::Position> {
				match position {
					$( $name::$v(i) => self.$n.index_before(i).map($name::$v), )+
				}
			}

			fn final_position_at(&self,dimension:usize) -> Option<Self::Position> {
				match dimension {
					$( $n => self.$n.final_index().map($name::$v), )+
					_ => dimension_out_of_range("final_position_at",dimension,Self::ARITY)
				}
			}
		}

		impl<$($c),+> RandomAccessChainConstituents for ($($c,)+)
		where $( $c: RandomAccessConstituent ),+
		{}

	};
}
pub(crate) use impl_chain_constituents;
