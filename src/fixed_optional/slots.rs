//! `Option` のタプルに対して、スロットの番号で各成分を呼び分けるトレイトを与えるモジュール

/// 固定個数の `Option` のタプル `(Option<T0>,Option<T1>,...)`
pub trait OptionalSlots {
	/// スロットの個数
	const ARITY:usize;
	/// スロットの値への参照を保持する直和型
	type Element<'a> where Self: 'a;

	/// スロット `slot` に値があるかどうか
	fn is_present_at(&self,slot:usize) -> bool;
	/// スロット `slot` の値への参照。値がなければ `None`
	fn element_at<'a>(&'a self,slot:usize) -> Option<Self::Element<'a>>;
}



/// * `Option` のタプルに対して `OptionalSlots` を実装するマクロ
/// * `impl_optional_slots!( names: Sum1 ... SumN; T0 V0 0 ... T(N-1) V(N-1) (N-1) )` と指定すれば、 `N` 個の要素まで対応する
macro_rules! impl_optional_slots {
	// マクロのエントリポイント: 全ての実装をモジュールで囲む
	( names: $( $name:ident )+ ; $( $t:ident $v:ident $n:tt )+ ) => {
		mod impl_optional_slots {
			use crate::{
				tuples::sum::*,
				fixed_optional::slots::*,
				product::constituents::dimension_out_of_range
			};

			$crate::fixed_optional::slots::impl_optional_slots! {@each [ $( $name )+ ] | $( $t $v $n )+ }
		}
	};
	(@each
		[ $name:ident $( $names:ident )* ]
		$( $t:ident $v:ident $n:tt )* |
		$tn:ident $vn:ident $nn:tt
		$( $others:tt )*
	) => {
		$crate::fixed_optional::slots::impl_optional_slots! {@one $name $( $t $v $n )* $tn $vn $nn }
		$crate::fixed_optional::slots::impl_optional_slots! {@each [ $( $names )* ] $( $t $v $n )* $tn $vn $nn | $( $others )* }
	};
	(@each [ $( $names:ident )* ] $( $t:ident $v:ident $n:tt )* | ) => {};
	(@one $name:ident $( $t:ident $v:ident $n:tt )+ ) => {

		impl<$($t),+> OptionalSlots for ( $( Option<$t>, )+ ) {
			const ARITY:usize = [ $( $n ),+ ].len();
			type Element<'a> = $name<$( &'a $t ),+> where Self: 'a;

			fn is_present_at(&self,slot:usize) -> bool {
				match slot {
					$( $n => self.$n.is_some(), )+
					_ => dimension_out_of_range("is_present_at",slot,Self::ARITY)
				}
			}

			fn element_at<'a>(&'a self,slot:usize) -> Option<Self::Element<'a>> {
				match slot {
					$( $n => self.$n.as_ref().map($name::$v), )+
					_ => dimension_out_of_range("element_at",slot,Self::ARITY)
				}
			}
		}

	};
}
pub(crate) use impl_optional_slots;
