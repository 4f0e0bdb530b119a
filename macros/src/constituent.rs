use proc_macro::TokenStream as TS1;
use proc_macro2::TokenStream as TS;
use quote::quote;
use syn::{
	parse_macro_input, parse_quote,
	DeriveInput, Data, Fields, Member, Type, Index, Error
};

macro_rules! derive_constituent_interface { ()=>{

	#[proc_macro_derive(Constituent,attributes(constituent))]
	pub fn derive_constituent(item:TokenStream) -> TokenStream {
		//! ## `Constituent`
		//! フィールドを1つだけ持つ構造体に対して、そのフィールドに委譲する形で構成要素のトレイトを実装します。
		//!
		//! * 既定では `Constituent` , `BidirectionalConstituent` , `RandomAccessConstituent` の全てを実装します
		//! * `#[constituent(bidirectional)]` とすると `BidirectionalConstituent` までを実装します
		//! * `#[constituent(forward_only)]` とすると `Constituent` のみを実装します
		//! * いずれの場合もフィールドの型が対応するトレイトを実装している必要があります
		//!
		//! ```rust
		//! use composites::prelude::*;
		//!
		//! #[derive(Constituent)]
		//! struct Scores(Vec<u32>);
		//!
		//! #[derive(Constituent)]
		//! #[constituent(bidirectional)]
		//! struct Names { inner: Vec<&'static str> }
		//!
		//! let p = Product::new( (Scores(vec![10,20]),Names { inner: vec!["a"] }) );
		//! assert_eq!(p.len(),2);
		//! ```
		crate::constituent::derive_constituent(item)
	}

} }
pub(crate) use derive_constituent_interface;

/// 実装するトレイトの範囲
#[derive(Clone,Copy,PartialEq,Eq,PartialOrd,Ord)]
enum Capability {
	ForwardOnly,
	Bidirectional,
	RandomAccess
}

pub fn derive_constituent(item:TS1) -> TS1 {
	let input = parse_macro_input!(item as DeriveInput);
	match expand(input) {
		Ok(ts) => ts.into(),
		Err(e) => e.to_compile_error().into()
	}
}

fn capability(input:&DeriveInput) -> syn::Result<Capability> {
	let mut capability = Capability::RandomAccess;
	for attr in input.attrs.iter().filter(|a| a.path().is_ident("constituent") ) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("forward_only") {
				capability = Capability::ForwardOnly;
				Ok(())
			}
			else if meta.path.is_ident("bidirectional") {
				capability = Capability::Bidirectional;
				Ok(())
			}
			else if meta.path.is_ident("random_access") {
				capability = Capability::RandomAccess;
				Ok(())
			}
			else { Err(meta.error("`forward_only` / `bidirectional` / `random_access` のいずれかを指定してください")) }
		})?;
	}
	Ok(capability)
}

/// 委譲先のフィールドと、その型
fn delegate(input:&DeriveInput) -> syn::Result<(Member,Type)> {
	let fields = match &input.data {
		Data::Struct(s) => &s.fields,
		_ => return Err(Error::new_spanned(&input.ident,"`Constituent` は構造体にのみ導出できます"))
	};
	let mut iter = fields.iter();
	match (iter.next(),iter.next()) {
		(Some(f),None) => {
			let member = match (&f.ident,fields) {
				(Some(i),Fields::Named(_)) => Member::Named(i.clone()),
				_ => Member::Unnamed(Index::from(0))
			};
			Ok((member,f.ty.clone()))
		},
		_ => Err(Error::new_spanned(&input.ident,"`Constituent` はフィールドを1つだけ持つ構造体にのみ導出できます"))
	}
}

fn expand(input:DeriveInput) -> syn::Result<TS> {
	let capability = capability(&input)?;
	let (member,inner) = delegate(&input)?;
	let name = &input.ident;
	let root = quote!(::composites::constituent);

	let impl_for = |bound:TS| {
		let mut generics = input.generics.clone();
		generics.make_where_clause().predicates.push(parse_quote!( #inner: #bound ));
		let (impl_generics,ty_generics,where_clause) = generics.split_for_impl();
		quote!( impl #impl_generics #bound for #name #ty_generics #where_clause )
	};

	let forward_head = impl_for(quote!(#root::Constituent));
	let mut ts = quote! {
		#forward_head {
			type Index = <#inner as #root::Constituent>::Index;
			type Element<'__element> = <#inner as #root::Constituent>::Element<'__element> where Self: '__element;

			#[inline]
			fn count(&self) -> usize { #root::Constituent::count(&self.#member) }
			#[inline]
			fn is_empty(&self) -> bool { #root::Constituent::is_empty(&self.#member) }
			#[inline]
			fn start_bound(&self) -> Self::Index { #root::Constituent::start_bound(&self.#member) }
			#[inline]
			fn end_bound(&self) -> Self::Index { #root::Constituent::end_bound(&self.#member) }
			#[inline]
			fn element_at<'__element>(&'__element self,index:&Self::Index) -> Self::Element<'__element> {
				#root::Constituent::element_at(&self.#member,index)
			}
			#[inline]
			fn index_after(&self,index:&Self::Index) -> Option<Self::Index> {
				#root::Constituent::index_after(&self.#member,index)
			}
			#[inline]
			fn distance(&self,from:&Self::Index,to:&Self::Index) -> usize {
				#root::Constituent::distance(&self.#member,from,to)
			}
			#[inline]
			fn index_offset_by(&self,index:&Self::Index,distance:usize) -> Self::Index {
				#root::Constituent::index_offset_by(&self.#member,index,distance)
			}
		}
	};

	if capability>=Capability::Bidirectional {
		let head = impl_for(quote!(#root::BidirectionalConstituent));
		ts.extend(quote! {
			#head {
				#[inline]
				fn index_before(&self,index:&Self::Index) -> Option<Self::Index> {
					#root::BidirectionalConstituent::index_before(&self.#member,index)
				}
				#[inline]
				fn final_index(&self) -> Option<Self::Index> {
					#root::BidirectionalConstituent::final_index(&self.#member)
				}
			}
		});
	}

	if capability>=Capability::RandomAccess {
		let head = impl_for(quote!(#root::RandomAccessConstituent));
		ts.extend(quote!( #head {} ));
	}

	Ok(ts)
}
