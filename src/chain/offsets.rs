//! 連結した構成要素の通し番号と、(次元, 次元内の距離) とを相互に変換する表

use super::*;

/// * 各次元の要素数と、各次元の最初の要素の通し番号 (それより前の次元の要素数の和) をまとめた表
/// * 全ての次元が空である場合に限り、総数が 0 になる
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub struct ChainOffsets {
	arity: usize,
	counts: [usize;MAX_ARITY],
	offsets: [usize;MAX_ARITY],
	total_count: usize
}

impl ChainOffsets {

	/// 各次元の要素数から表を作成します
	pub fn new(counts:&[usize]) -> Self {
		let arity = counts.len();
		if arity==0 || arity>MAX_ARITY {
			contract_violation!("ChainOffsets::new","次元数 {} は 1 以上 {} 以下でなければなりません",arity,MAX_ARITY);
		}
		let mut table = Self {
			arity,
			counts: [0;MAX_ARITY],
			offsets: [0;MAX_ARITY],
			total_count: 0
		};
		table.counts[..arity].copy_from_slice(counts);
		let mut offset = 0_usize;
		for (k,&count) in counts.iter().enumerate() {
			table.offsets[k] = offset;
			offset = offset.checked_add(count)
			.unwrap_or_else(|| contract_violation!("ChainOffsets::new","要素数 {:?} の和が usize に収まりません",counts) );
		}
		table.total_count = offset;
		table
	}

	/// 構成要素のタプルから表を作成します
	pub fn of<C: ChainConstituents>(constituents:&C) -> Self {
		let mut counts = [0_usize;MAX_ARITY];
		for (k,count) in counts.iter_mut().enumerate().take(C::ARITY) {
			*count = constituents.count_at(k);
		}
		Self::new(&counts[..C::ARITY])
	}

	/// 構成要素の個数
	#[inline]
	pub fn arity(&self) -> usize { self.arity }
	/// 各構成要素の要素数
	#[inline]
	pub fn counts(&self) -> &[usize] { &self.counts[..self.arity] }
	/// 各構成要素の最初の要素の通し番号 (要素数の累積和)
	#[inline]
	pub fn offsets(&self) -> &[usize] { &self.offsets[..self.arity] }
	/// 全ての構成要素の要素数の合計
	#[inline]
	pub fn total_count(&self) -> usize { self.total_count }

	/// 次元 `dimension` の中での距離から通し番号を計算します
	pub fn linearize(&self,dimension:usize,distance:usize) -> usize {
		if dimension>=self.arity {
			internal_inconsistency!("linearize","次元 {} は次元数 {} の範囲外です",dimension,self.arity);
		}
		if distance>=self.counts[dimension] {
			internal_inconsistency!("linearize","次元 {} の距離 {} が要素数 {} の範囲外です",dimension,distance,self.counts[dimension]);
		}
		self.offsets[dimension]+distance
	}

	/// 通し番号を含む次元と、その次元の中での距離を求めます
	pub fn locate(&self,offset:usize) -> (usize,usize) {
		if offset>=self.total_count {
			contract_violation!("locate","通し番号 {} は要素数 {} の範囲外です",offset,self.total_count);
		}
		(0..self.arity)
		.find(|&k| offset<self.offsets[k]+self.counts[k] )
		.map(|k| (k,offset-self.offsets[k]) )
		.unwrap_or_else(|| internal_inconsistency!("locate","通し番号 {} を含む次元が見つかりません",offset) )
	}

}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn offsets_are_prefix_sums() {
		let t = ChainOffsets::new(&[2,0,3]);
		assert_eq!(t.offsets(),&[0,2,2]);
		assert_eq!(t.total_count(),5);
		assert_eq!(t.linearize(2,1),3);
		assert_eq!(t.locate(1),(0,1));
		assert_eq!(t.locate(2),(2,0));
		assert_eq!(t.locate(4),(2,2));
	}

	#[test]
	fn all_empty_dimensions_give_zero_total() {
		let t = ChainOffsets::new(&[0,0]);
		assert_eq!(t.total_count(),0);
	}

	#[test]
	#[should_panic(expected="[契約違反] locate")]
	fn offset_past_total_faults() {
		ChainOffsets::new(&[1,1]).locate(2);
	}

	#[test]
	#[should_panic(expected="[内部不整合] linearize")]
	fn distance_outside_dimension_is_internal_fault() {
		ChainOffsets::new(&[1,3]).linearize(0,1);
	}
}
