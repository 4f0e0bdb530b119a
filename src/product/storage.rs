//! 直積の構成要素とキャッシュを所有し、位置の演算を行うストレージ

use super::*;
use crate::logging::diagnostics;

use once_cell::sync::OnceCell;

/// * 直積の構成要素と、そこから計算されるキャッシュを所有するストレージ
/// * キャッシュは最初に必要になったときに計算され、構成要素が書き換えられると全て破棄される
pub struct ProductStorage<C: ProductConstituents> {
	constituents: C,
	is_empty: OnceCell<bool>,
	strides: OnceCell<StrideTable>,
	start_index: OnceCell<ProductIndex<C::Position>>,
	final_position: OnceCell<Option<C::Position>>
}

impl<C> Clone for ProductStorage<C> where C: ProductConstituents + Clone {
	fn clone(&self) -> Self {
		Self {
			constituents: self.constituents.clone(),
			is_empty: self.is_empty.clone(),
			strides: self.strides.clone(),
			start_index: self.start_index.clone(),
			final_position: self.final_position.clone()
		}
	}
}

impl<C: ProductConstituents> CompositeStorage for ProductStorage<C> {
	type Constituents = C;
	const KIND:&'static str = "Product";

	fn from_constituents(constituents:C) -> Self {
		Self {
			constituents,
			is_empty: OnceCell::new(),
			strides: OnceCell::new(),
			start_index: OnceCell::new(),
			final_position: OnceCell::new()
		}
	}

	fn constituents(&self) -> &C { &self.constituents }

	fn constituents_mut(&mut self) -> &mut C { &mut self.constituents }

	fn into_constituents(self) -> C { self.constituents }

	fn invalidate(&mut self) {
		self.is_empty.take();
		self.strides.take();
		self.start_index.take();
		self.final_position.take();
		diagnostics::caches_invalidated(Self::KIND);
	}
}

impl<C: ProductConstituents> ProductStorage<C> {

	/// 直積が空かどうか。いずれかの構成要素が空であれば空になる
	pub fn is_empty(&self) -> bool {
		*self.is_empty.get_or_init(|| {
			diagnostics::cache_recomputed(Self::KIND,"is_empty");
			(0..C::ARITY).any(|k| self.constituents.is_empty_at(k) )
		})
	}

	/// ストライド表
	pub fn stride_table(&self) -> &StrideTable {
		self.strides.get_or_init(|| {
			diagnostics::cache_recomputed(Self::KIND,"stride_table");
			StrideTable::of(&self.constituents)
		})
	}

	/// 要素の総数
	pub fn total_count(&self) -> usize {
		if self.is_empty() { return 0; }
		self.stride_table().total_count()
	}

	/// 最初の要素の添字。空であれば終端
	pub fn start_index(&self) -> &ProductIndex<C::Position> {
		self.start_index.get_or_init(|| {
			diagnostics::cache_recomputed(Self::KIND,"start_index");
			if self.is_empty() { ProductIndex::End }
			else { ProductIndex::Position(self.constituents.start_position()) }
		})
	}

	/// 位置が全ての次元で参照可能かどうかを確認します (デバッグビルドのみ)
	#[inline]
	#[track_caller]
	fn debug_validate(&self,position:&C::Position,operation:&str) {
		if cfg!(debug_assertions) {
			for k in 0..C::ARITY {
				if !self.constituents.is_dereferenceable_at(k,position) {
					contract_violation!(operation,"位置 {:?} の次元 {} は参照可能な添字ではありません",position,k);
				}
			}
		}
	}

	/// 位置が指す要素
	#[track_caller]
	pub fn element_at(&self,position:&C::Position) -> C::Element<'_> {
		self.debug_validate(position,"element_at");
		self.constituents.element_at(position)
	}

	/// * オドメータと同じ要領で次の位置を求めます
	/// * 末尾の次元から順に進め、最後の添字であった次元は開始位置に戻して1つ上位の次元に繰り上げる
	/// * 全ての次元で繰り上がった場合は次の位置が存在しないので `None` を返す
	#[track_caller]
	pub fn position_after(&self,position:&C::Position) -> Option<C::Position> {
		self.debug_validate(position,"position_after");
		let mut next = position.clone();
		// 進めることのできた次元より上位の次元は変化しないので、そこで打ち切る
		for k in (0..C::ARITY).rev() {
			if self.constituents.advance_at(k,&mut next) { return Some(next); }
		}
		None
	}

	/// 位置を通し番号に変換します。各次元の距離にストライドを掛けて足し合わせる
	pub fn linearize(&self,position:&C::Position) -> usize {
		self.debug_validate(position,"linearize");
		let table = self.stride_table();
		let mut distances = [0_usize;MAX_ARITY];
		for (k,distance) in distances.iter_mut().enumerate().take(C::ARITY) {
			*distance = self.constituents.distance_at(k,position);
		}
		table.linearize(&distances[..C::ARITY])
	}

	/// 通し番号を各次元の開始位置からの距離に分解します
	pub fn delinearize(&self,offset:usize) -> Distances {
		self.stride_table().delinearize(offset)
	}

	/// 通し番号に対応する位置
	pub fn position_for(&self,offset:usize) -> C::Position {
		let distances = self.delinearize(offset);
		let mut position = self.constituents.start_position();
		for (k,&distance) in distances.iter().enumerate() {
			self.constituents.set_distance_at(k,&mut position,distance);
		}
		position
	}

}

impl<C: BidirectionalProductConstituents> ProductStorage<C> {

	/// 全ての次元が最後の添字にある位置。空であれば `None`
	pub fn final_position(&self) -> Option<&C::Position> {
		self.final_position.get_or_init(|| {
			diagnostics::cache_recomputed(Self::KIND,"final_position");
			if self.is_empty() { None }
			else { self.constituents.final_position() }
		})
		.as_ref()
	}

	/// * `position_after` と対称に、前の位置を求めます
	/// * 開始位置であった次元は最後の添字に移し、1つ上位の次元から繰り下げる
	/// * 全ての次元が開始位置にある場合は前の位置が存在しないので `None` を返す
	#[track_caller]
	pub fn position_before(&self,position:&C::Position) -> Option<C::Position> {
		self.debug_validate(position,"position_before");
		let mut previous = position.clone();
		for k in (0..C::ARITY).rev() {
			if self.constituents.retreat_at(k,&mut previous) { return Some(previous); }
		}
		None
	}

}



#[cfg(test)]
mod tests {
	use super::*;

	type Pair = (Vec<i32>,Vec<char>);

	fn pair() -> ProductStorage<Pair> {
		ProductStorage::from_constituents( (vec![0,1],vec!['x','y','z']) )
	}

	#[test]
	fn odometer_visits_every_offset_in_order() {
		let s = pair();
		let mut visited = vec![];
		let mut cursor = s.start_index().clone().into_position();
		while let Some(p) = cursor {
			visited.push(s.linearize(&p));
			cursor = s.position_after(&p);
		}
		assert_eq!(visited,(0..6).collect::<Vec<_>>());
	}

	#[test]
	fn retreat_mirrors_advance() {
		let s = pair();
		for offset in 0..5 {
			let p = s.position_for(offset);
			let next = s.position_after(&p).expect("最後の位置ではありません");
			assert_eq!(s.position_before(&next),Some(p));
		}
		assert_eq!(s.position_before(&(0,0)),None);
		assert_eq!(s.final_position(),Some(&(1,2)));
	}

	#[test]
	fn with_replaces_one_constituent_and_clears_caches() {
		let s = pair();
		assert_eq!(s.total_count(),6);
		let t = s.with::<1>(vec!['q']);
		assert_eq!(t.total_count(),2);
		assert_eq!(t.element_at(&(1,0)),(&1,&'q'));
		assert_eq!(s.total_count(),6);
	}

	#[test]
	fn invalidate_recomputes_every_cache() {
		let mut s = pair();
		assert_eq!(s.final_position(),Some(&(1,2)));
		s.constituents_mut().0.clear();
		s.invalidate();
		assert!(s.is_empty());
		assert_eq!(s.total_count(),0);
		assert_eq!(s.start_index(),&ProductIndex::End);
		assert_eq!(s.final_position(),None);
	}

	#[cfg(debug_assertions)]
	#[test]
	#[should_panic(expected="[契約違反] element_at")]
	fn foreign_position_faults_in_debug_builds() {
		pair().element_at(&(0,3));
	}
}
