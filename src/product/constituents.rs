//! 直積の構成要素のタプルに対して、次元ごとの操作を次元の番号で呼び分けるトレイトを与えるモジュール
//! * オドメータやストライド表の計算は次元数に依らず、このトレイトを通して一度だけ書かれている
//! * 次元数ごとに必要になるのは、番号から各成分への振り分けだけであり、これをマクロで生成する

use super::*;

/// 直積を構成する構成要素のタプル `(C0,C1,...)`
pub trait ProductConstituents {
	/// 次元数
	const ARITY:usize;
	/// 各次元の添字のタプル。導出された順序は次元 0 を最上位とする辞書式の順序になる
	type Position: Clone + Eq + Ord + Hash + Debug;
	/// 各次元の要素のタプル
	type Element<'a> where Self: 'a;

	/// 次元 `dimension` の要素数
	fn count_at(&self,dimension:usize) -> usize;
	/// 次元 `dimension` が空かどうか
	fn is_empty_at(&self,dimension:usize) -> bool;
	/// 全ての次元が開始位置にある位置
	fn start_position(&self) -> Self::Position;
	/// 各次元の要素を取り出してタプルにまとめます
	fn element_at<'a>(&'a self,position:&Self::Position) -> Self::Element<'a>;
	/// * 次元 `dimension` の添字を1つ進め、 `true` を返します
	/// * 最後の添字だった場合は開始位置に戻し、 `false` を返す (上位の次元への繰り上がり)
	fn advance_at(&self,dimension:usize,position:&mut Self::Position) -> bool;
	/// 次元 `dimension` の開始位置から、位置の成分までの距離
	fn distance_at(&self,dimension:usize,position:&Self::Position) -> usize;
	/// 次元 `dimension` の成分を、開始位置から `distance` だけ進めた添字に置き換えます
	fn set_distance_at(&self,dimension:usize,position:&mut Self::Position,distance:usize);
	/// 次元 `dimension` の成分が参照可能な添字 (開始位置以上かつ終端未満) かどうか
	fn is_dereferenceable_at(&self,dimension:usize,position:&Self::Position) -> bool;
}

/// 全ての構成要素を逆向きにも辿れる直積の構成要素
pub trait BidirectionalProductConstituents: ProductConstituents {
	/// * 次元 `dimension` の添字を1つ戻し、 `true` を返します
	/// * 開始位置だった場合は最後の添字に移し、 `false` を返す (上位の次元からの繰り下がり)
	fn retreat_at(&self,dimension:usize,position:&mut Self::Position) -> bool;
	/// 全ての次元が最後の添字にある位置。いずれかの次元が空であれば `None`
	fn final_position(&self) -> Option<Self::Position>;
}

/// 全ての構成要素がランダムアクセス可能な直積の構成要素
pub trait RandomAccessProductConstituents: BidirectionalProductConstituents {}

/// 存在しない次元の番号が与えられたことを報告する
#[cold]
#[track_caller]
pub(crate) fn dimension_out_of_range(operation:&str,dimension:usize,arity:usize) -> ! {
	internal_inconsistency!(operation,"次元 {} は次元数 {} の範囲外です",dimension,arity)
}



/// * 構成要素のタプルに対して `ProductConstituents` などを実装するマクロ
/// * `impl_product_constituents!( C0 0 C1 1 C2 2 ... C(N-1) (N-1) )` と指定すれば、 `N` 個の要素まで対応する
macro_rules! impl_product_constituents {
	// マクロのエントリポイント: 全ての実装をモジュールで囲む
	( $( $c:ident $n:tt )+ ) => {
		mod impl_product_constituents {
			use crate::{
				constituent::*,
				product::constituents::*,
				logging::fault::internal_inconsistency
			};

			$crate::product::constituents::impl_product_constituents! {@each | $( $c $n )+ }
		}
	};
	(@each $( $c:ident $n:tt )* | $cn:ident $nn:tt $( $others:tt )* ) => {
		$crate::product::constituents::impl_product_constituents! {@one $( $c $n )* $cn $nn }
		$crate::product::constituents::impl_product_constituents! {@each $( $c $n )* $cn $nn | $( $others )* }
	};
	(@each $( $c:ident $n:tt )* | ) => {};
	// 要素数を固定した実装
	(@one $( $c:ident $n:tt )+ ) => {

		impl<$($c),+> ProductConstituents for ($($c,)+)
		where $( $c: Constituent ),+
		{
			const ARITY:usize = [ $( $n ),+ ].len();
			type Position = ( $( $c::Index, )+ );
			type Element<'a> = ( $( $c::Element<'a>, )+ ) where Self: 'a;

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

			fn start_position(&self) -> Self::Position {
				( $( self.$n.start_bound(), )+ )
			}

			fn element_at<'a>(&'a self,position:&Self::Position) -> Self::Element<'a> {
				( $( self.$n.element_at(&position.$n), )+ )
			}

			fn advance_at(&self,dimension:usize,position:&mut Self::Position) -> bool {
				match dimension {
					$( $n => match self.$n.index_after(&position.$n) {
						Some(next) => { position.$n = next; true },
						None => { position.$n = self.$n.start_bound(); false }
					}, )+
					_ => dimension_out_of_range("advance_at",dimension,Self::ARITY)
				}
			}

			fn distance_at(&self,dimension:usize,position:&Self::Position) -> usize {
				match dimension {
					$( $n => self.$n.distance(&self.$n.start_bound(),&position.$n), )+
					_ => dimension_out_of_range("distance_at",dimension,Self::ARITY)
				}
			}

			fn set_distance_at(&self,dimension:usize,position:&mut Self::Position,distance:usize) {
				match dimension {
					$( $n => { position.$n = self.$n.index_offset_by(&self.$n.start_bound(),distance); }, )+
					_ => dimension_out_of_range("set_distance_at",dimension,Self::ARITY)
				}
			}

			fn is_dereferenceable_at(&self,dimension:usize,position:&Self::Position) -> bool {
				match dimension {
					$( $n => self.$n.start_bound()<=position.$n && position.$n<self.$n.end_bound(), )+
					_ => dimension_out_of_range("is_dereferenceable_at",dimension,Self::ARITY)
				}
			}
		}

		impl<$($c),+> BidirectionalProductConstituents for ($($c,)+)
		where $( $c: BidirectionalConstituent ),+
		{
			fn retreat_at(&self,dimension:usize,position:&mut Self::Position) -> bool {
				match dimension {
					$( $n => match self.$n.index_before(&position.$n) {
						Some(previous) => { position.$n = previous; true },
						None => {
							position.$n = self.$n.final_index()
							.unwrap_or_else(|| internal_inconsistency!(
								"retreat_at","空の次元 {} を最後の添字に戻すことはできません",$n
							) );
							false
						}
					}, )+
					_ => dimension_out_of_range("retreat_at",dimension,Self::ARITY)
				}
			}

			fn final_position(&self) -> Option<Self::Position> {
				Some( ( $( self.$n.final_index()?, )+ ) )
			}
		}

		impl<$($c),+> RandomAccessProductConstituents for ($($c,)+)
		where $( $c: RandomAccessConstituent ),+
		{}

	};
}
pub(crate) use impl_product_constituents;
