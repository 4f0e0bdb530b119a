//! 連結の構成要素とキャッシュを所有し、位置の演算を行うストレージ

use super::*;
use crate::logging::diagnostics;

use once_cell::sync::OnceCell;

/// * 連結の構成要素と、そこから計算されるキャッシュを所有するストレージ
/// * キャッシュは最初に必要になったときに計算され、構成要素が書き換えられると全て破棄される
pub struct ChainStorage<C: ChainConstituents> {
	constituents: C,
	offsets: OnceCell<ChainOffsets>,
	start_index: OnceCell<ChainIndex<C::Position>>,
	final_position: OnceCell<Option<C::Position>>
}

impl<C> Clone for ChainStorage<C> where C: ChainConstituents + Clone {
	fn clone(&self) -> Self {
		Self {
			constituents: self.constituents.clone(),
			offsets: self.offsets.clone(),
			start_index: self.start_index.clone(),
			final_position: self.final_position.clone()
		}
	}
}

impl<C: ChainConstituents> CompositeStorage for ChainStorage<C> {
	type Constituents = C;
	const KIND:&'static str = "Chain";

	fn from_constituents(constituents:C) -> Self {
		Self {
			constituents,
			offsets: OnceCell::new(),
			start_index: OnceCell::new(),
			final_position: OnceCell::new()
		}
	}

	fn constituents(&self) -> &C { &self.constituents }

	fn constituents_mut(&mut self) -> &mut C { &mut self.constituents }

	fn into_constituents(self) -> C { self.constituents }

	fn invalidate(&mut self) {
		self.offsets.take();
		self.start_index.take();
		self.final_position.take();
		diagnostics::caches_invalidated(Self::KIND);
	}
}

impl<C: ChainConstituents> ChainStorage<C> {

	/// 各次元の通し番号の表
	pub fn offsets(&self) -> &ChainOffsets {
		self.offsets.get_or_init(|| {
			diagnostics::cache_recomputed(Self::KIND,"offsets");
			ChainOffsets::of(&self.constituents)
		})
	}

	/// 要素の総数 (各構成要素の要素数の和)
	pub fn total_count(&self) -> usize {
		self.offsets().total_count()
	}

	/// 全ての構成要素が空であるかどうか
	pub fn is_empty(&self) -> bool {
		self.total_count()==0
	}

	/// 空でない最初の構成要素の開始位置。全て空であれば終端
	pub fn start_index(&self) -> &ChainIndex<C::Position> {
		self.start_index.get_or_init(|| {
			diagnostics::cache_recomputed(Self::KIND,"start_index");
			self.first_position_from(0).into()
		})
	}

	/// 次元 `dimension` 以降で、空でない最初の構成要素の開始位置
	fn first_position_from(&self,dimension:usize) -> Option<C::Position> {
		(dimension..C::ARITY)
		.find(|&k| !self.constituents.is_empty_at(k) )
		.map(|k| self.constituents.start_position_at(k) )
	}

	/// 位置が参照可能かどうかを確認します (デバッグビルドのみ)
	#[inline]
	#[track_caller]
	fn debug_validate(&self,position:&C::Position,operation:&str) {
		if cfg!(debug_assertions) && !self.constituents.is_dereferenceable(position) {
			contract_violation!(operation,"位置 {:?} は参照可能な添字ではありません",position);
		}
	}

	/// 位置が指す要素
	#[track_caller]
	pub fn element_at(&self,position:&C::Position) -> C::Element<'_> {
		self.debug_validate(position,"element_at");
		self.constituents.element_at(position)
	}

	/// * 次の位置を求めます
	/// * 現在の構成要素の最後の添字であれば、空でない次の構成要素の開始位置に移る
	#[track_caller]
	pub fn position_after(&self,position:&C::Position) -> Option<C::Position> {
		self.debug_validate(position,"position_after");
		self.constituents.step_after(position)
		.or_else(|| self.first_position_from(position.variant()+1) )
	}

	/// 位置を通し番号に変換します
	pub fn linearize(&self,position:&C::Position) -> usize {
		self.debug_validate(position,"linearize");
		self.offsets().linearize(position.variant(),self.constituents.distance_in(position))
	}

	/// 通し番号に対応する位置
	pub fn position_for(&self,offset:usize) -> C::Position {
		let (dimension,distance) = self.offsets().locate(offset);
		self.constituents.position_at_distance(dimension,distance)
	}

}

impl<C: BidirectionalChainConstituents> ChainStorage<C> {

	/// 空でない最後の構成要素の最後の位置。全て空であれば `None`
	pub fn final_position(&self) -> Option<&C::Position> {
		self.final_position.get_or_init(|| {
			diagnostics::cache_recomputed(Self::KIND,"final_position");
			self.last_position_before(C::ARITY)
		})
		.as_ref()
	}

	/// 次元 `dimension` より前で、空でない最後の構成要素の最後の位置
	fn last_position_before(&self,dimension:usize) -> Option<C::Position> {
		(0..dimension).rev().find_map(|k| self.constituents.final_position_at(k) )
	}

	/// * 前の位置を求めます
	/// * 現在の構成要素の開始位置であれば、空でない前の構成要素の最後の位置に移る
	#[track_caller]
	pub fn position_before(&self,position:&C::Position) -> Option<C::Position> {
		self.debug_validate(position,"position_before");
		self.constituents.step_before(position)
		.or_else(|| self.last_position_before(position.variant()) )
	}

}



#[cfg(test)]
mod tests {
	use super::*;

	type Gapped = (Vec<char>,Vec<char>,[char;2]);

	fn gapped() -> ChainStorage<Gapped> {
		ChainStorage::from_constituents( (vec!['a'],vec![],['b','c']) )
	}

	#[test]
	fn empty_constituents_are_skipped() {
		let s = gapped();
		assert_eq!(s.total_count(),3);
		assert_eq!(s.start_index(),&ChainIndex::Position(Sum3::V0(0)));
		assert_eq!(s.position_after(&Sum3::V0(0)),Some(Sum3::V2(0)));
		assert_eq!(s.position_after(&Sum3::V2(1)),None);
		assert_eq!(s.position_before(&Sum3::V2(0)),Some(Sum3::V0(0)));
		assert_eq!(s.final_position(),Some(&Sum3::V2(1)));
	}

	#[test]
	fn linear_offsets_cross_constituents() {
		let s = gapped();
		assert_eq!(s.linearize(&Sum3::V2(1)),2);
		assert_eq!(s.position_for(1),Sum3::V2(0));
		assert_eq!(s.element_at(&s.position_for(2)),Sum3::V2(&'c'));
	}

	#[test]
	fn leading_empty_constituent_moves_the_start() {
		let s = ChainStorage::from_constituents( (Vec::<u8>::new(),vec![7_u8]) );
		assert_eq!(s.start_index(),&ChainIndex::Position(Sum2::V1(0)));
		assert_eq!(s.position_before(&Sum2::V1(0)),None);
	}

	#[test]
	fn invalidate_recomputes_offsets() {
		let mut s = gapped();
		assert_eq!(s.total_count(),3);
		s.constituents_mut().1.push('z');
		s.invalidate();
		assert_eq!(s.total_count(),4);
		assert_eq!(s.position_after(&Sum3::V0(0)),Some(Sum3::V1(0)));
	}

	#[cfg(debug_assertions)]
	#[test]
	#[should_panic(expected="[契約違反] element_at")]
	fn position_in_empty_constituent_faults_in_debug_builds() {
		gapped().element_at(&Sum3::V1(0));
	}
}
