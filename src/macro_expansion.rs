//! ## `macro_expansion`
//! ここでは、各ソースファイルで定義されたタプルに対するトレイトの実装をまとめて行うマクロを、まとめて呼び出している
//! タプルは要素個数ごとに実装が必要であり、その最大個数 (`product::MAX_ARITY`) をここで一元的に制御している

crate::tuples::sum::impl_sums!(
	names: Sum1 Sum2 Sum3 Sum4 Sum5 Sum6 Sum7;
	T0 V0 0 T1 V1 1 T2 V2 2 T3 V3 3 T4 V4 4 T5 V5 5 T6 V6 6
);

crate::tuples::slot::impl_slots!( T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 );

crate::product::constituents::impl_product_constituents!( C0 0 C1 1 C2 2 C3 3 C4 4 C5 5 C6 6 );

crate::chain::constituents::impl_chain_constituents!(
	names: Sum1 Sum2 Sum3 Sum4 Sum5 Sum6 Sum7;
	C0 V0 0 C1 V1 1 C2 V2 2 C3 V3 3 C4 V4 4 C5 V5 5 C6 V6 6
);

crate::fixed_optional::slots::impl_optional_slots!(
	names: Sum1 Sum2 Sum3 Sum4 Sum5 Sum6 Sum7;
	T0 V0 0 T1 V1 1 T2 V2 2 T3 V3 3 T4 V4 4 T5 V5 5 T6 V6 6
);
