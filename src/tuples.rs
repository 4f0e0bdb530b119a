//! タプルの要素数ごとに定義が必要な、合成コレクションの土台となる型やトレイトをまとめたモジュール

/// 複数の型のうちいずれか1つを保持する直和型を定義するモジュール
/// * `SumChain` の要素や、 `Chain` / `SumChain` の位置 (どの構成要素のどの添字か) として使用する
/// * 導出された順序はまずバリアント (次元) を比較し、次に中身を比較するので、連結したコレクションの並び順と一致する
pub mod sum {

	/// 全てのバリアントが同じ型を保持している直和型を、その型の値に統合するトレイト
	pub trait Merge {
		type Output;
		/// どのバリアントであるかを忘れ、中身の値を取り出します
		fn merge(self) -> Self::Output;
	}

	/// 要素数に関係なく直和型が共通して持つ性質
	pub trait Variant {
		/// 保持しているバリアントの番号 (0 始まり) を返します
		fn variant(&self) -> usize;
	}

	/// 型引数を別の型に置き換えるための補助マクロ
	macro_rules! replace {
		( $_t:tt $sub:ty ) => { $sub };
	}
	pub(crate) use replace;

	/// * 要素数ごとに直和型 `SumN` を定義するマクロ
	/// * `impl_sums!( names: Sum1 Sum2 ... SumN; T0 V0 0 T1 V1 1 ... T(N-1) V(N-1) (N-1) )` と指定すれば、 `N` 個の要素まで対応する
	/// * 型パラメータ、バリアント名、バリアント番号をこの順で並べていく
	/// * 定義された型はモジュール `sum_types` に置かれ、このモジュールから再エクスポートされる
	macro_rules! impl_sums {
		// マクロのエントリポイント: 全ての定義をモジュールで囲む
		( names: $( $name:ident )+ ; $( $t:ident $v:ident $n:tt )+ ) => {
			pub(crate) mod sum_types {
				use crate::tuples::sum::{ Merge, Variant };

				$crate::tuples::sum::impl_sums! {@each [ $( $name )+ ] | $( $t $v $n )+ }
			}
		};
		// 先頭の名前を、1つだけ要素を増やした直和型に割り当てる
		(@each
			[ $name:ident $( $names:ident )* ]
			$( $t:ident $v:ident $n:tt )* |
			$tn:ident $vn:ident $nn:tt
			$( $others:tt )*
		) => {
			$crate::tuples::sum::impl_sums! {@one $name $( $t $v $n )* $tn $vn $nn }
			$crate::tuples::sum::impl_sums! {@each [ $( $names )* ] $( $t $v $n )* $tn $vn $nn | $( $others )* }
		};
		(@each [ $( $names:ident )* ] $( $t:ident $v:ident $n:tt )* | ) => {};
		// 直和型を1つ定義する
		(@one $name:ident $( $t:ident $v:ident $n:tt )+ ) => {

			#[derive(Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Debug)]
			#[cfg_attr(feature="serde",derive(serde::Serialize,serde::Deserialize))]
			pub enum $name<$($t),+> {
				$( $v($t), )+
			}

			impl<$($t),+> $name<$($t),+> {
				/// 中身を参照する直和型に変換します
				pub fn as_ref(&self) -> $name<$(&$t),+> {
					match self { $( Self::$v(x) => $name::$v(x), )+ }
				}
			}

			impl<$($t),+> Variant for $name<$($t),+> {
				fn variant(&self) -> usize {
					match self { $( Self::$v(_) => $n, )+ }
				}
			}

			impl<T> Merge for $name<$( $crate::tuples::sum::replace!($t T) ),+> {
				type Output = T;
				fn merge(self) -> T {
					match self { $( Self::$v(x) => x, )+ }
				}
			}

		};
	}
	pub(crate) use impl_sums;

	pub use crate::macro_expansion::sum_types::*;

}



/// タプルの特定の成分に、成分の番号を型レベルで指定してアクセスするモジュール
pub mod slot {

	/// タプルの `K` 番目の成分にアクセスするトレイト
	pub trait Slot<const K:usize> {
		type Item;
		/// `K` 番目の成分を参照します
		fn slot(&self) -> &Self::Item;
		/// `K` 番目の成分を書き換え可能な参照で返します
		fn slot_mut(&mut self) -> &mut Self::Item;
		/// `K` 番目の成分を置き換え、元の値を返します
		fn replace_slot(&mut self,value:Self::Item) -> Self::Item {
			std::mem::replace(self.slot_mut(),value)
		}
	}

	/// `K` 番目の成分だけを置き換えたタプルを、他の成分を複製して生成するトレイト
	/// * 置き換えられる成分は複製されないので、 `Clone` である必要はない
	pub trait WithSlot<const K:usize>: Slot<K> + Sized {
		fn with_slot(&self,value:Self::Item) -> Self;
	}

	/// * タプルの各成分に対して `Slot` を実装するマクロ
	/// * `impl_slots!( T0 0 T1 1 T2 2 ... T(N-1) (N-1) )` と指定すれば、 `N` 個の要素まで対応する
	macro_rules! impl_slots {
		( $( $t:ident $n:tt )+ ) => {
			mod impl_slots {
				use crate::tuples::slot::{ Slot, WithSlot };

				$crate::tuples::slot::impl_slots! {@each | $( $t $n )+ }
			}
		};
		(@each $( $t:ident $n:tt )* | $tn:ident $nn:tt $( $others:tt )* ) => {
			$crate::tuples::slot::impl_slots! {@slots [ $( $t )* $tn ] | $( $t $n )* $tn $nn }
			$crate::tuples::slot::impl_slots! {@each $( $t $n )* $tn $nn | $( $others )* }
		};
		(@each $( $t:ident $n:tt )* | ) => {};
		(@slots [ $( $all:ident )+ ] $( $tp:ident $np:tt )* | ) => {};
		// タプル `($all,...)` の成分を1つずつ取り出して実装する。 `|` より前は実装済みの成分
		(@slots [ $( $all:ident )+ ] $( $tp:ident $np:tt )* | $tk:ident $nk:tt $( $ts:ident $ns:tt )* ) => {
			impl<$($all),+> Slot<$nk> for ($($all,)+) {
				type Item = $tk;
				fn slot(&self) -> &$tk { &self.$nk }
				fn slot_mut(&mut self) -> &mut $tk { &mut self.$nk }
			}
			impl<$($all),+> WithSlot<$nk> for ($($all,)+) where $( $tp: Clone, )* $( $ts: Clone, )* {
				fn with_slot(&self,value:$tk) -> Self {
					( $( self.$np.clone(), )* value, $( self.$ns.clone(), )* )
				}
			}
			$crate::tuples::slot::impl_slots! {@slots [ $( $all )+ ] $( $tp $np )* $tk $nk | $( $ts $ns )* }
		};
	}
	pub(crate) use impl_slots;

}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::{
		sum::{ Merge, Variant },
		slot::{ Slot, WithSlot }
	};
}



#[cfg(test)]
mod tests {
	use super::{ sum::*, slot::{ Slot, WithSlot } };

	#[test]
	/// 直和型の順序がバリアント優先であることを確認する
	fn sum_ordering_follows_variant_first() {
		let a:Sum3<u8,u8,u8> = Sum3::V0(9);
		let b:Sum3<u8,u8,u8> = Sum3::V1(0);
		let c:Sum3<u8,u8,u8> = Sum3::V1(4);
		assert!(a<b);
		assert!(b<c);
		assert_eq!(c.variant(),1);
		assert_eq!(c.merge(),4);
	}

	#[test]
	fn sum_as_ref_keeps_variant() {
		let s:Sum2<String,i32> = Sum2::V0("abc".to_string());
		match s.as_ref() {
			Sum2::V0(x) => assert_eq!(x,"abc"),
			Sum2::V1(_) => panic!("バリアントが変化しました")
		}
	}

	#[test]
	fn slot_access_and_replace() {
		let mut t = (1_u8,"two",3.0_f64);
		assert_eq!(*Slot::<1>::slot(&t),"two");
		*Slot::<0>::slot_mut(&mut t) = 10;
		let old = Slot::<2>::replace_slot(&mut t,4.5);
		assert_eq!(old,3.0);
		assert_eq!(t,(10,"two",4.5));
	}

	#[test]
	fn with_slot_keeps_the_other_components() {
		/// 複製できない成分
		#[derive(Debug,PartialEq)]
		struct Unique(u8);
		let t = (String::from("a"),Unique(1),vec![2]);
		let u = WithSlot::<1>::with_slot(&t,Unique(7));
		assert_eq!(u,(String::from("a"),Unique(7),vec![2]));
		assert_eq!(t.1,Unique(1));
	}
}
