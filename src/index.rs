//! 合成コレクションの添字を表すモジュール

/// * 合成コレクションの添字。要素を指す位置 `Position` か、終端 `End` のいずれか
/// * 終端は全ての位置より大きい。位置同士は位置の型の順序で比較する
/// * 直積では位置が各次元の添字のタプルになるので、辞書式 (次元 0 が最上位) の比較になる
#[derive(Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Debug)]
#[cfg_attr(feature="serde",derive(serde::Serialize,serde::Deserialize))]
pub enum CompositeIndex<P> {
	Position(P),
	End
}

impl<P> CompositeIndex<P> {
	/// 終端かどうか
	pub fn is_end(&self) -> bool {
		matches!(self,Self::End)
	}
	/// 位置を参照します。終端であれば `None`
	pub fn position(&self) -> Option<&P> {
		match self {
			Self::Position(p) => Some(p),
			Self::End => None
		}
	}
	/// 位置を取り出します。終端であれば `None`
	pub fn into_position(self) -> Option<P> {
		match self {
			Self::Position(p) => Some(p),
			Self::End => None
		}
	}
}

impl<P> From<Option<P>> for CompositeIndex<P> {
	/// `None` を終端とみなして添字に変換します
	fn from(position:Option<P>) -> Self {
		position.map_or(Self::End,Self::Position)
	}
}



#[cfg(test)]
#[test]
fn end_is_greater_than_every_position() {
	let a = CompositeIndex::Position((0_usize,5_usize));
	let b = CompositeIndex::Position((1,0));
	let e = CompositeIndex::End;
	assert!(a<b);
	assert!(b<e);
	assert!(e.is_end());
	assert_eq!(b.position(),Some(&(1,0)));
	assert_eq!(CompositeIndex::<u8>::from(None),CompositeIndex::End);
}
