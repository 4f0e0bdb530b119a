//! `Option` のタプルと、値のあるスロットを表すビットマスクを所有するストレージ
//! * 前後のスロットはビット走査で、通し番号はビット数の数え上げで求める

use super::*;
use crate::logging::diagnostics;

use once_cell::sync::OnceCell;

/// スロット `slot` より下位のビット
#[inline]
fn bits_below(slot:usize) -> u8 {
	(1_u8<<slot)-1
}

/// スロット `slot` より上位のビット
#[inline]
fn bits_above(slot:usize) -> u8 {
	!bits_below(slot+1)
}

/// 最上位の立っているビットの番号
#[inline]
fn highest_bit(mask:u8) -> Option<usize> {
	(mask!=0).then(|| (u8::BITS-1-mask.leading_zeros()) as usize )
}

/// 最下位の立っているビットの番号
#[inline]
fn lowest_bit(mask:u8) -> Option<usize> {
	(mask!=0).then(|| mask.trailing_zeros() as usize )
}

/// * `Option` のタプルと、値のあるスロットのビットマスクを所有するストレージ
/// * ビットマスクは最初に必要になったときに計算され、スロットが書き換えられると破棄される
pub struct OptionalStorage<C: OptionalSlots> {
	constituents: C,
	presence: OnceCell<u8>
}

impl<C> Clone for OptionalStorage<C> where C: OptionalSlots + Clone {
	fn clone(&self) -> Self {
		Self {
			constituents: self.constituents.clone(),
			presence: self.presence.clone()
		}
	}
}

impl<C: OptionalSlots> CompositeStorage for OptionalStorage<C> {
	type Constituents = C;
	const KIND:&'static str = "FixedOptional";

	fn from_constituents(constituents:C) -> Self {
		Self { constituents, presence: OnceCell::new() }
	}

	fn constituents(&self) -> &C { &self.constituents }

	fn constituents_mut(&mut self) -> &mut C { &mut self.constituents }

	fn into_constituents(self) -> C { self.constituents }

	fn invalidate(&mut self) {
		self.presence.take();
		diagnostics::caches_invalidated(Self::KIND);
	}
}

impl<C: OptionalSlots> OptionalStorage<C> {

	/// 値のあるスロットのビットが立ったマスク
	pub fn presence(&self) -> u8 {
		*self.presence.get_or_init(|| {
			diagnostics::cache_recomputed(Self::KIND,"presence");
			(0..C::ARITY)
			.filter(|&k| self.constituents.is_present_at(k) )
			.fold(0_u8,|mask,k| mask|(1<<k) )
		})
	}

	/// 値のあるスロットの個数
	pub fn total_count(&self) -> usize {
		self.presence().count_ones() as usize
	}

	/// 値のあるスロットが1つもないかどうか
	pub fn is_empty(&self) -> bool {
		self.presence()==0
	}

	/// 値のある最初のスロット
	pub fn start_slot(&self) -> Option<usize> {
		lowest_bit(self.presence())
	}

	/// 値のある最後のスロット
	pub fn final_slot(&self) -> Option<usize> {
		highest_bit(self.presence())
	}

	/// スロットが値のあるスロットであることを確認します
	#[track_caller]
	fn validate(&self,slot:usize,operation:&str) {
		if slot>=C::ARITY || self.presence()&(1<<slot)==0 {
			contract_violation!(operation,"スロット {} には値がありません",slot);
		}
	}

	/// スロットの値への参照
	#[track_caller]
	pub fn element_at(&self,slot:usize) -> C::Element<'_> {
		self.validate(slot,"element_at");
		self.constituents.element_at(slot)
		.unwrap_or_else(|| internal_inconsistency!("element_at","スロット {} のビットが立っていますが値がありません",slot) )
	}

	/// 値のある次のスロット
	#[track_caller]
	pub fn slot_after(&self,slot:usize) -> Option<usize> {
		self.validate(slot,"slot_after");
		lowest_bit(self.presence()&bits_above(slot))
	}

	/// 値のある前のスロット
	#[track_caller]
	pub fn slot_before(&self,slot:usize) -> Option<usize> {
		self.validate(slot,"slot_before");
		highest_bit(self.presence()&bits_below(slot))
	}

	/// スロットの通し番号 (それより前にある値のあるスロットの個数)
	#[track_caller]
	pub fn linearize(&self,slot:usize) -> usize {
		self.validate(slot,"linearize");
		(self.presence()&bits_below(slot)).count_ones() as usize
	}

	/// 通し番号に対応するスロット
	#[track_caller]
	pub fn slot_for(&self,offset:usize) -> usize {
		let total = self.total_count();
		if offset>=total {
			contract_violation!("slot_for","通し番号 {} は要素数 {} の範囲外です",offset,total);
		}
		// 下位のビットを offset 個だけ落とす
		let mut mask = self.presence();
		for _ in 0..offset { mask &= mask-1; }
		lowest_bit(mask)
		.unwrap_or_else(|| internal_inconsistency!("slot_for","通し番号 {} に対応するスロットが見つかりません",offset) )
	}

}



#[cfg(test)]
mod tests {
	use super::*;

	type Slots = (Option<u8>,Option<&'static str>,Option<char>,Option<u8>);

	fn sparse() -> OptionalStorage<Slots> {
		OptionalStorage::from_constituents( (None,Some("one"),None,Some(3)) )
	}

	#[test]
	fn bit_scans_find_neighbours() {
		let s = sparse();
		assert_eq!(s.presence(),0b1010);
		assert_eq!(s.total_count(),2);
		assert_eq!(s.start_slot(),Some(1));
		assert_eq!(s.final_slot(),Some(3));
		assert_eq!(s.slot_after(1),Some(3));
		assert_eq!(s.slot_after(3),None);
		assert_eq!(s.slot_before(3),Some(1));
		assert_eq!(s.slot_before(1),None);
	}

	#[test]
	fn offsets_count_present_slots() {
		let s = sparse();
		assert_eq!(s.linearize(1),0);
		assert_eq!(s.linearize(3),1);
		assert_eq!(s.slot_for(0),1);
		assert_eq!(s.slot_for(1),3);
		assert_eq!(s.element_at(3),Sum4::V3(&3));
	}

	#[test]
	fn invalidate_recomputes_presence() {
		let mut s = sparse();
		assert_eq!(s.total_count(),2);
		s.constituents_mut().2 = Some('c');
		s.invalidate();
		assert_eq!(s.presence(),0b1110);
		assert_eq!(s.slot_after(1),Some(2));
	}

	#[test]
	#[should_panic(expected="[契約違反] element_at")]
	fn absent_slot_faults() {
		sparse().element_at(0);
	}

	#[test]
	#[should_panic(expected="[契約違反] slot_for")]
	fn offset_past_total_faults() {
		sparse().slot_for(2);
	}
}
