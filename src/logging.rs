use std::fmt::Display;

/// 文字列を受け取るためのジェネリックな型
pub trait AnyStr: AsRef<str> + Display {}
impl<T: AsRef<str> + Display + ?Sized> AnyStr for T {}



/// 呼び出し側の誤用 (契約違反) と、ライブラリ内部の不整合とを区別して報告するモジュール
/// * いずれも回復可能なエラーではないので、ログを出力した上でパニックを発生させる
/// * メッセージの先頭には種別を表す接頭辞 `[契約違反]` / `[内部不整合]` が付く
pub mod fault {
	use super::AnyStr;

	#[cfg(feature="logging")]
	extern crate log;

	/// 契約違反を表す接頭辞
	pub const CONTRACT_VIOLATION:&str = "[契約違反]";
	/// 内部不整合を表す接頭辞
	pub const INTERNAL_INCONSISTENCY:&str = "[内部不整合]";

	#[track_caller]
	fn report(kind:&str,operation:&str,message:&str) -> ! {
		#[cfg(feature="logging")]
		log::error!("{} {}: {}",kind,operation,message);
		#[cfg(not(feature="logging"))]
		eprintln!("ERROR: {} {}: {}",kind,operation,message);
		panic!("{} {}: {}",kind,operation,message);
	}

	/// 呼び出し側が操作の前提条件を破ったことを報告する
	#[cold]
	#[track_caller]
	pub fn report_contract_violation(operation:&str,message:impl AnyStr) -> ! {
		report(CONTRACT_VIOLATION,operation,message.as_ref())
	}

	/// ストライド表やオドメータなど、内部の計算が矛盾したことを報告する
	#[cold]
	#[track_caller]
	pub fn report_internal_inconsistency(operation:&str,message:impl AnyStr) -> ! {
		report(INTERNAL_INCONSISTENCY,operation,message.as_ref())
	}

	/// 契約違反をマクロ形式で展開する
	macro_rules! contract_violation {
		($operation:expr, $($arg:tt)+) => {
			$crate::logging::fault::report_contract_violation($operation,&format!($($arg)+))
		};
	}
	pub(crate) use contract_violation;

	/// 内部不整合をマクロ形式で展開する
	macro_rules! internal_inconsistency {
		($operation:expr, $($arg:tt)+) => {
			$crate::logging::fault::report_internal_inconsistency($operation,&format!($($arg)+))
		};
	}
	pub(crate) use internal_inconsistency;

}



/// キャッシュの再計算や共有ストレージの複製など、診断用の記録を行うモジュール
/// * `logging` フィーチャーが無効な場合は何も出力しない
pub(crate) mod diagnostics {

	#[cfg(feature="logging")]
	extern crate log;

	/// キャッシュを再計算したことを記録する
	pub(crate) fn cache_recomputed(kind:&str,what:&str) {
		#[cfg(feature="logging")]
		log::trace!("{}: {} を再計算しました",kind,what);
		#[cfg(not(feature="logging"))]
		let _ = (kind,what);
	}

	/// 共有されていたストレージを書き換えのために複製したことを記録する
	pub(crate) fn storage_forked(kind:&str) {
		#[cfg(feature="logging")]
		log::debug!("{}: 共有されたストレージを書き換え前に複製しました",kind);
		#[cfg(not(feature="logging"))]
		let _ = kind;
	}

	/// キャッシュを破棄したことを記録する
	pub(crate) fn caches_invalidated(kind:&str) {
		#[cfg(feature="logging")]
		log::trace!("{}: 構成要素が書き換えられたため全てのキャッシュを破棄しました",kind);
		#[cfg(not(feature="logging"))]
		let _ = kind;
	}

}



/// このモジュールからクレートの `prelude` でアクセスできるようにするアイテムをまとめたもの
pub(crate) mod for_prelude {
	pub use super::AnyStr;
}



#[cfg(test)]
#[test]
#[should_panic(expected="[契約違反] index_after: 終端を越えて進めることはできません")]
fn contract_violation_message() {
	fault::contract_violation!("index_after","終端を越えて進めることはできません");
}

#[cfg(test)]
#[test]
#[should_panic(expected="[内部不整合] delinearize")]
fn internal_inconsistency_message() {
	fault::internal_inconsistency!("delinearize","次元 {} の距離 {} が範囲外です",1,7);
}
