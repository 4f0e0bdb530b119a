//! 直積の位置と、0 から始まる通し番号 (線形オフセット) とを相互に変換する混合基数のストライド表

use super::*;

/// 扱うことのできる最大の次元数
pub const MAX_ARITY:usize = 7;

/// * 各次元の要素数と、各次元を1つ進めたときに通し番号がいくつ進むか (ストライド) をまとめた表
/// * 末尾の次元のストライドは 1 であり、 `stride[k] = stride[k+1] * count[k+1]` を満たす
/// * いずれかの次元が空であれば、全てのストライドと総数は 0 になる
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub struct StrideTable {
	arity: usize,
	counts: [usize;MAX_ARITY],
	strides: [usize;MAX_ARITY],
	total_count: usize
}

/// 各次元の開始位置からの距離。 `Deref` により次元数ぶんのスライスとして扱える
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub struct Distances {
	arity: usize,
	values: [usize;MAX_ARITY]
}

impl std::ops::Deref for Distances {
	type Target = [usize];
	fn deref(&self) -> &[usize] {
		&self.values[..self.arity]
	}
}

impl StrideTable {

	/// 各次元の要素数からストライド表を作成します
	pub fn new(counts:&[usize]) -> Self {
		let arity = counts.len();
		if arity==0 || arity>MAX_ARITY {
			contract_violation!("StrideTable::new","次元数 {} は 1 以上 {} 以下でなければなりません",arity,MAX_ARITY);
		}
		let mut table = Self {
			arity,
			counts: [0;MAX_ARITY],
			strides: [0;MAX_ARITY],
			total_count: 0
		};
		table.counts[..arity].copy_from_slice(counts);
		if counts.contains(&0) { return table; }

		let mut stride = 1_usize;
		for k in (0..arity).rev() {
			table.strides[k] = stride;
			stride = stride.checked_mul(counts[k])
			.unwrap_or_else(|| contract_violation!("StrideTable::new","要素数 {:?} の積が usize に収まりません",counts) );
		}
		table.total_count = stride;
		table
	}

	/// 構成要素のタプルからストライド表を作成します
	pub fn of<C: ProductConstituents>(constituents:&C) -> Self {
		let mut counts = [0_usize;MAX_ARITY];
		for (k,count) in counts.iter_mut().enumerate().take(C::ARITY) {
			*count = constituents.count_at(k);
		}
		Self::new(&counts[..C::ARITY])
	}

	/// 次元数
	#[inline]
	pub fn arity(&self) -> usize { self.arity }
	/// 各次元の要素数
	#[inline]
	pub fn counts(&self) -> &[usize] { &self.counts[..self.arity] }
	/// 各次元のストライド
	#[inline]
	pub fn strides(&self) -> &[usize] { &self.strides[..self.arity] }
	/// 直積の要素の総数
	#[inline]
	pub fn total_count(&self) -> usize { self.total_count }
	/// 直積が空かどうか (いずれかの次元が空)
	#[inline]
	pub fn is_empty(&self) -> bool { self.total_count==0 }

	/// 各次元の距離から通し番号を計算します
	pub fn linearize(&self,distances:&[usize]) -> usize {
		if distances.len()!=self.arity {
			internal_inconsistency!("linearize","距離の次元数 {} がストライド表の次元数 {} と一致しません",distances.len(),self.arity);
		}
		distances.iter().enumerate()
		.map(|(k,&distance)| {
			if distance>=self.counts[k] {
				internal_inconsistency!("linearize","次元 {} の距離 {} が要素数 {} の範囲外です",k,distance,self.counts[k]);
			}
			self.strides[k]*distance
		})
		.sum()
	}

	/// 通し番号を各次元の距離に分解します
	pub fn delinearize(&self,offset:usize) -> Distances {
		if offset>=self.total_count {
			contract_violation!("delinearize","通し番号 {} は要素数 {} の範囲外です",offset,self.total_count);
		}
		let mut distances = Distances { arity: self.arity, values: [0;MAX_ARITY] };
		let mut remainder = offset;
		for k in 0..self.arity {
			let distance = remainder/self.strides[k];
			remainder %= self.strides[k];
			if distance>=self.counts[k] {
				internal_inconsistency!("delinearize","次元 {} の距離 {} が要素数 {} の範囲外です",k,distance,self.counts[k]);
			}
			distances.values[k] = distance;
		}
		distances
	}

}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strides_follow_mixed_radix() {
		let t = StrideTable::new(&[2,3,4]);
		assert_eq!(t.strides(),&[12,4,1]);
		assert_eq!(t.total_count(),24);
		assert_eq!(t.linearize(&[1,2,3]),23);
		assert_eq!(&*t.delinearize(23),&[1,2,3]);
	}

	#[test]
	fn two_by_three_scenario() {
		let t = StrideTable::new(&[2,3]);
		assert_eq!(t.total_count(),6);
		assert_eq!(t.linearize(&[1,1]),4);
		assert_eq!(&*t.delinearize(4),&[1,1]);
	}

	#[test]
	fn any_empty_dimension_empties_the_table() {
		let t = StrideTable::new(&[3,0,5]);
		assert!(t.is_empty());
		assert_eq!(t.total_count(),0);
		assert_eq!(t.strides(),&[0,0,0]);
	}

	#[test]
	fn every_offset_round_trips() {
		let t = StrideTable::new(&[3,1,2,5]);
		for offset in 0..t.total_count() {
			let d = t.delinearize(offset);
			assert_eq!(t.linearize(&d),offset);
		}
	}

	#[test]
	#[should_panic(expected="[契約違反] delinearize")]
	fn offset_past_total_faults() {
		StrideTable::new(&[2,2]).delinearize(4);
	}

	#[test]
	#[should_panic(expected="[内部不整合] linearize")]
	fn distance_outside_count_is_internal_fault() {
		StrideTable::new(&[2,2]).linearize(&[0,2]);
	}
}
