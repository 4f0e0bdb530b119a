//! 複数のコレクションを、要素を複製せずに1つのコレクションとして扱う合成コレクションのライブラリ
//! * `Product` : 直積 (カーテジアン積)
//! * `Chain` / `SumChain` : 連結
//! * `FixedOptional` : 固定個数の `Option` のうち値のあるもの

extern crate self as composites;

mod logging;
pub use logging::*;
pub(crate) use logging::fault::{ contract_violation, internal_inconsistency };

pub mod constituent;

pub mod tuples;

pub mod index;

mod cow;
pub use cow::CompositeStorage;

pub mod product;

pub mod chain;

pub mod fixed_optional;

pub mod macros {
	extern crate macros;
	pub use macros::*;
}

mod macro_expansion;



/// このライブラリで定義された型やトレイト、マクロなどにまとめてアクセスできるモジュール
/// `use composites::prelude::*;` とすることで全てのリソースがインポートされる
pub mod prelude {
	pub use super::{
		constituent::for_prelude::*,
		tuples::for_prelude::*,
		tuples::sum::*,
		logging::for_prelude::*,
		index::CompositeIndex,
		product::for_prelude::*,
		chain::for_prelude::*,
		fixed_optional::for_prelude::*,
		macros::*
	};
}
/// このクレート内では、クレートで定義されたリソースを展開する
pub(crate) use prelude::*;
